/// Comment repository - documents in the `comments` collection
use bson::{doc, oid::ObjectId};
use mongodb::options::FindOneOptions;
use serde::Deserialize;

use super::post_repo::author_lookup;
use super::{expr, Database, Page, Pipeline, VoteState, COMMENTS, USERS};
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentView};

/// Post, author and parent of a stored comment
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CommentRefs {
    pub post: ObjectId,
    pub author: ObjectId,
    #[serde(default)]
    pub parent: Option<ObjectId>,
}

/// Comments of `post`, oldest first
pub fn of_post_pipeline(post: ObjectId, viewer: ObjectId, page: Page) -> Pipeline {
    Pipeline::new()
        .match_(doc! { "post": post })
        .project(doc! {
            "_id": 1,
            "post": 1,
            "parent": 1,
            "content": 1,
            "date": 1,
            "author": 1,
            "upvoted": expr::contains(viewer, "upvotes"),
            "upvotes": expr::size_of("upvotes"),
            "answers": expr::size_of("answers"),
        })
        .lookup_pipeline(USERS, doc! { "author": "$author" }, author_lookup(), "author")
        .sort(doc! { "date": 1, "_id": 1 })
        .paginate(page)
        .add_fields(doc! { "author": expr::first("author") })
}

#[derive(Clone)]
pub struct CommentRepository {
    db: Database,
}

impl CommentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn comments(&self) -> mongodb::Collection<Comment> {
        self.db.collection(COMMENTS)
    }

    pub async fn insert(&self, comment: &Comment) -> Result<ObjectId> {
        let result = self.comments().insert_one(comment, None).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("insert returned a non-ObjectId key".to_string()))
    }

    pub async fn refs(&self, id: ObjectId) -> Result<Option<CommentRefs>> {
        let options = FindOneOptions::builder()
            .projection(doc! { "post": 1, "author": 1, "parent": 1 })
            .build();

        Ok(self
            .db
            .collection::<CommentRefs>(COMMENTS)
            .find_one(doc! { "_id": id }, options)
            .await?)
    }

    pub async fn of_post(
        &self,
        post: ObjectId,
        viewer: ObjectId,
        page: Page,
    ) -> Result<Vec<CommentView>> {
        self.db
            .aggregate(COMMENTS, of_post_pipeline(post, viewer, page))
            .await
    }

    pub async fn vote_state(&self, id: ObjectId, user: ObjectId) -> Result<Option<VoteState>> {
        let pipeline = Pipeline::new().match_(doc! { "_id": id }).project(doc! {
            "upvoted": expr::contains(user, "upvotes"),
            "author": 1,
        });
        self.db.aggregate_one(COMMENTS, pipeline).await
    }

    pub async fn add_upvote(&self, id: ObjectId, user: ObjectId) -> Result<()> {
        self.comments()
            .update_one(
                doc! { "_id": id },
                doc! { "$addToSet": { "upvotes": user } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn remove_upvote(&self, id: ObjectId, user: ObjectId) -> Result<()> {
        self.comments()
            .update_one(doc! { "_id": id }, doc! { "$pull": { "upvotes": user } }, None)
            .await?;
        Ok(())
    }

    /// Embed `reply` into the parent's `answers`
    pub async fn embed_reply(&self, parent: ObjectId, reply: &Comment) -> Result<()> {
        let reply = bson::to_document(reply)?;
        self.comments()
            .update_one(
                doc! { "_id": parent },
                doc! { "$push": { "answers": reply } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn pull_reply(&self, parent: ObjectId, reply: ObjectId) -> Result<()> {
        self.comments()
            .update_one(
                doc! { "_id": parent },
                doc! { "$pull": { "answers": { "_id": reply } } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool> {
        let result = self.comments().delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}
