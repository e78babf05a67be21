/// Posts, feeds and post upvotes
use bson::{oid::ObjectId, Bson, DateTime};
use serde::Deserialize;
use std::collections::HashMap;

use super::{NotificationService, VoteAction};
use crate::config::FeedConfig;
use crate::db::post_repo::{feed_pipeline, FeedKind};
use crate::db::{Page, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::i18n::Template;
use crate::middleware::check_post_ownership;
use crate::models::{Post, PostView};

/// Body of `POST /posts/create`
#[derive(Debug, Default, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Vec<Bson>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NewPost {
    fn into_post(self, author: ObjectId, community: ObjectId) -> Result<Post> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is not given".to_string()));
        }
        if self.content.is_empty() {
            return Err(AppError::Validation("Content is not given".to_string()));
        }

        Ok(Post {
            id: None,
            title: self.title,
            content: self.content,
            author,
            community,
            tags: self.tags,
            images: self.images,
            upvotes: Vec::new(),
            answers: Vec::new(),
            date: DateTime::now(),
        })
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: PostRepository,
    users: UserRepository,
    notifications: NotificationService,
    feed: FeedConfig,
}

impl PostService {
    pub fn new(
        posts: PostRepository,
        users: UserRepository,
        notifications: NotificationService,
        feed: FeedConfig,
    ) -> Self {
        Self {
            posts,
            users,
            notifications,
            feed,
        }
    }

    pub async fn create(&self, author: ObjectId, new_post: NewPost) -> Result<ObjectId> {
        let post = new_post.into_post(author, self.feed.default_community)?;
        let id = self.posts.insert(&post).await?;

        tracing::info!(post = %id, author = %author, "post created");
        Ok(id)
    }

    pub async fn find(&self, id: ObjectId, viewer: ObjectId) -> Result<PostView> {
        self.posts
            .find_view(id, viewer)
            .await?
            .ok_or_else(|| AppError::NotFound("Post Not Found".to_string()))
    }

    /// One page of `kind`, sized by the configured post limit
    pub async fn feed(&self, kind: FeedKind, viewer: ObjectId, page: i64) -> Result<Vec<PostView>> {
        let page = Page::new(page, self.feed.post_limit)?;

        let followed = match kind {
            FeedKind::Personal => Some(self.users.follows_of(viewer).await?),
            FeedKind::New | FeedKind::Liked => None,
        };

        let pipeline = feed_pipeline(
            kind,
            self.feed.default_community,
            followed.as_deref(),
            viewer,
            page,
        );
        self.posts.feed(pipeline).await
    }

    /// Delete a post and every comment under it; author only
    pub async fn delete(&self, id: ObjectId, caller: ObjectId) -> Result<()> {
        let author = self
            .posts
            .author_of(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post Not Found".to_string()))?;
        check_post_ownership(caller, author)?;

        let comments = self.posts.delete_with_comments(id).await?;
        tracing::info!(post = %id, comments, "post deleted");
        Ok(())
    }

    pub async fn vote(&self, action: VoteAction, id: ObjectId, caller: ObjectId) -> Result<()> {
        let state = self
            .posts
            .vote_state(id, caller)
            .await?
            .ok_or_else(|| AppError::NotFound("Post Not Found".to_string()))?;

        match action {
            VoteAction::Upvote => {
                if state.upvoted {
                    return Err(AppError::Conflict("Post already upvoted".to_string()));
                }
                self.posts.add_upvote(id, caller).await?;

                if state.author != caller {
                    self.notify_author(state.author, caller, id).await?;
                }
            }
            VoteAction::Downvote => {
                if !state.upvoted {
                    return Err(AppError::Conflict("Post already downvoted".to_string()));
                }
                self.posts.remove_upvote(id, caller).await?;
            }
        }
        Ok(())
    }

    async fn notify_author(&self, author: ObjectId, caller: ObjectId, post: ObjectId) -> Result<()> {
        if let Some(actor) = self.users.find_by_id(caller).await? {
            let data = HashMap::from([("post".to_string(), post.to_hex())]);
            self.notifications
                .notify_logged(author, Template::POST_UPVOTE, &actor.display_name(), data)
                .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_new_post_seeded_for_author() {
        let author = ObjectId::new();
        let community = ObjectId::new();
        let new_post = NewPost {
            title: "Hello".into(),
            content: vec![Bson::Document(doc! { "type": "paragraph" })],
            tags: vec!["rust".into()],
            images: vec![],
        };

        let post = new_post.into_post(author, community).unwrap();
        assert_eq!(post.author, author);
        assert_eq!(post.community, community);
        assert!(post.upvotes.is_empty() && post.answers.is_empty());
    }

    #[test]
    fn test_new_post_requires_title_and_content() {
        let missing_title = NewPost {
            content: vec![Bson::String("x".into())],
            ..NewPost::default()
        };
        let err = missing_title
            .into_post(ObjectId::new(), ObjectId::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Title is not given");

        let missing_content = NewPost {
            title: "t".into(),
            ..NewPost::default()
        };
        let err = missing_content
            .into_post(ObjectId::new(), ObjectId::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Content is not given");
    }
}
