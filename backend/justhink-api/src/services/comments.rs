/// Comments, nested replies and comment upvotes
use bson::{oid::ObjectId, Bson, DateTime};
use serde::Deserialize;
use std::collections::HashMap;

use super::{NotificationService, VoteAction};
use crate::config::FeedConfig;
use crate::db::{CommentRepository, Page, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::i18n::Template;
use crate::middleware::check_comment_ownership;
use crate::models::{Comment, CommentView};

/// Body of `POST /comments/create`
#[derive(Debug, Deserialize)]
pub struct NewComment {
    /// Post the comment belongs to
    #[serde(rename = "_id", default)]
    pub post: Option<String>,
    #[serde(default)]
    pub answer: Answer,
}

#[derive(Debug, Default, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub content: Vec<Bson>,
    #[serde(default)]
    pub parent: Option<String>,
}

impl NewComment {
    /// Validated comment for `author` with a freshly assigned id
    fn into_comment(self, author: ObjectId) -> Result<Comment> {
        let post = self
            .post
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AppError::Validation("PostID is not given".to_string()))?;
        let post = ObjectId::parse_str(post.trim())?;
        if self.answer.content.is_empty() {
            return Err(AppError::Validation("Content is not given".to_string()));
        }

        let parent = match self.answer.parent.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(ObjectId::parse_str(raw)?),
            _ => None,
        };

        Ok(Comment {
            id: Some(ObjectId::new()),
            post,
            author,
            date: DateTime::now(),
            parent,
            content: self.answer.content,
            upvotes: Vec::new(),
            answers: Vec::new(),
        })
    }
}

#[derive(Clone)]
pub struct CommentService {
    comments: CommentRepository,
    posts: PostRepository,
    users: UserRepository,
    notifications: NotificationService,
    feed: FeedConfig,
}

impl CommentService {
    pub fn new(
        comments: CommentRepository,
        posts: PostRepository,
        users: UserRepository,
        notifications: NotificationService,
        feed: FeedConfig,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
            notifications,
            feed,
        }
    }

    pub async fn of_post(
        &self,
        post: ObjectId,
        viewer: ObjectId,
        page: i64,
    ) -> Result<Vec<CommentView>> {
        let page = Page::new(page, self.feed.post_limit)?;
        self.comments.of_post(post, viewer, page).await
    }

    pub async fn create(&self, author: ObjectId, new_comment: NewComment) -> Result<ObjectId> {
        let comment = new_comment.into_comment(author)?;
        let id = comment
            .id
            .ok_or_else(|| AppError::Internal("comment id not assigned".to_string()))?;

        let post_author = self
            .posts
            .author_of(comment.post)
            .await?
            .ok_or_else(|| AppError::NotFound("Post Not Found".to_string()))?;

        if let Some(parent) = comment.parent {
            let parent_refs = self.comments.refs(parent).await?;
            if parent_refs.map(|r| r.post) != Some(comment.post) {
                return Err(AppError::NotFound("Comment Not Found".to_string()));
            }
        }

        self.posts.push_answer(comment.post, id).await?;
        self.comments.insert(&comment).await?;
        if let Some(parent) = comment.parent {
            self.comments.embed_reply(parent, &comment).await?;
        }

        tracing::info!(comment = %id, post = %comment.post, "comment created");

        if post_author != author {
            let data = HashMap::from([("post".to_string(), comment.post.to_hex())]);
            self.notify(post_author, author, Template::POST_COMMENT, data)
                .await?;
        }
        Ok(id)
    }

    /// Remove a comment and every reference to it; author only
    pub async fn delete(&self, id: ObjectId, caller: ObjectId) -> Result<()> {
        let refs = self
            .comments
            .refs(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment Not Found".to_string()))?;
        check_comment_ownership(caller, refs.author)?;

        self.comments.delete(id).await?;
        self.posts.pull_answer(refs.post, id).await?;
        if let Some(parent) = refs.parent {
            self.comments.pull_reply(parent, id).await?;
        }

        tracing::info!(comment = %id, post = %refs.post, "comment deleted");
        Ok(())
    }

    pub async fn vote(&self, action: VoteAction, id: ObjectId, caller: ObjectId) -> Result<()> {
        let state = self
            .comments
            .vote_state(id, caller)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment Not Found".to_string()))?;

        match action {
            VoteAction::Upvote => {
                if state.upvoted {
                    return Err(AppError::Conflict("Comment already upvoted".to_string()));
                }
                self.comments.add_upvote(id, caller).await?;

                if state.author != caller {
                    let data = HashMap::from([("comment".to_string(), id.to_hex())]);
                    self.notify(state.author, caller, Template::COMMENT_UPVOTE, data)
                        .await?;
                }
            }
            VoteAction::Downvote => {
                if !state.upvoted {
                    return Err(AppError::Conflict("Comment already downvoted".to_string()));
                }
                self.comments.remove_upvote(id, caller).await?;
            }
        }
        Ok(())
    }

    async fn notify(
        &self,
        target: ObjectId,
        actor: ObjectId,
        template: Template,
        data: HashMap<String, String>,
    ) -> Result<()> {
        if let Some(actor) = self.users.find_by_id(actor).await? {
            self.notifications
                .notify_logged(target, template, &actor.display_name(), data)
                .await;
        }
        Ok(())
    }
}
