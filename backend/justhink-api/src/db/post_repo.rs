/// Post repository - documents in the `posts` collection
use bson::{doc, oid::ObjectId, Bson, Document, Regex};
use mongodb::options::FindOneOptions;
use serde::Deserialize;

use super::{expr, Database, Page, Pipeline, VoteState, COMMENTS, COMMUNITIES, POSTS, USERS};
use crate::error::{AppError, Result};
use crate::models::{Post, PostHit, PostView};

/// Which feed to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Posts by accounts the viewer follows, newest first
    Personal,
    /// Newest first
    New,
    /// Most upvoted first, then newest
    Liked,
}

impl FeedKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "personal" => Some(FeedKind::Personal),
            "new" => Some(FeedKind::New),
            "liked" => Some(FeedKind::Liked),
            _ => None,
        }
    }

    /// `_id` is the final key so equal timestamps still page deterministically
    pub fn sort(self) -> Document {
        match self {
            FeedKind::Personal | FeedKind::New => doc! { "date": -1, "_id": -1 },
            FeedKind::Liked => doc! { "upvotes": -1, "date": -1, "_id": -1 },
        }
    }
}

/// Author summary join used by post and comment views
pub(crate) fn author_lookup() -> Pipeline {
    Pipeline::new().match_(expr::id_equals_var("author")).project(doc! {
        "_id": 1,
        "fullname": 1,
        "username": 1,
        "image": 1,
        "verified": 1,
    })
}

fn community_lookup() -> Pipeline {
    Pipeline::new()
        .match_(expr::id_equals_var("community"))
        .project(doc! {
            "_id": 1,
            "title": 1,
            "image": 1,
            "members": expr::size_of("members"),
        })
}

/// `match → project → lookup author → lookup community`, the common head of
/// every post view query
fn view_pipeline(filter: Document, viewer: ObjectId) -> Pipeline {
    Pipeline::new()
        .match_(filter)
        .project(doc! {
            "_id": 1,
            "community": 1,
            "images": 1,
            "tags": 1,
            "title": 1,
            "content": 1,
            "date": 1,
            "author": 1,
            "upvoted": expr::contains(viewer, "upvotes"),
            "answers": expr::size_of("answers"),
            "upvotes": expr::size_of("upvotes"),
        })
        .lookup_pipeline(USERS, doc! { "author": "$author" }, author_lookup(), "author")
        .lookup_pipeline(
            COMMUNITIES,
            doc! { "community": "$community" },
            community_lookup(),
            "community",
        )
}

/// Collapse the single-element lookup arrays into summaries
fn flatten_lookups(pipeline: Pipeline) -> Pipeline {
    pipeline.add_fields(doc! {
        "author": expr::first("author"),
        "community": expr::first("community"),
    })
}

/// Feed query for `kind` within `community`
pub fn feed_pipeline(
    kind: FeedKind,
    community: ObjectId,
    authors: Option<&[ObjectId]>,
    viewer: ObjectId,
    page: Page,
) -> Pipeline {
    let mut filter = doc! { "community": community };
    if let Some(authors) = authors {
        filter.insert("author", doc! { "$in": authors.to_vec() });
    }

    flatten_lookups(
        view_pipeline(filter, viewer)
            .sort(kind.sort())
            .paginate(page),
    )
}

#[derive(Clone)]
pub struct PostRepository {
    db: Database,
}

impl PostRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn posts(&self) -> mongodb::Collection<Post> {
        self.db.collection(POSTS)
    }

    pub async fn insert(&self, post: &Post) -> Result<ObjectId> {
        let result = self.posts().insert_one(post, None).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("insert returned a non-ObjectId key".to_string()))
    }

    pub async fn find_view(&self, id: ObjectId, viewer: ObjectId) -> Result<Option<PostView>> {
        let pipeline = flatten_lookups(view_pipeline(doc! { "_id": id }, viewer));
        self.db.aggregate_one(POSTS, pipeline).await
    }

    pub async fn feed(&self, pipeline: Pipeline) -> Result<Vec<PostView>> {
        self.db.aggregate(POSTS, pipeline).await
    }

    pub async fn author_of(&self, id: ObjectId) -> Result<Option<ObjectId>> {
        #[derive(Deserialize)]
        struct AuthorOnly {
            author: ObjectId,
        }

        let options = FindOneOptions::builder()
            .projection(doc! { "author": 1 })
            .build();
        let found = self
            .db
            .collection::<AuthorOnly>(POSTS)
            .find_one(doc! { "_id": id }, options)
            .await?;

        Ok(found.map(|p| p.author))
    }

    pub async fn vote_state(&self, id: ObjectId, user: ObjectId) -> Result<Option<VoteState>> {
        let pipeline = Pipeline::new().match_(doc! { "_id": id }).project(doc! {
            "upvoted": expr::contains(user, "upvotes"),
            "author": 1,
        });
        self.db.aggregate_one(POSTS, pipeline).await
    }

    pub async fn add_upvote(&self, id: ObjectId, user: ObjectId) -> Result<()> {
        self.posts()
            .update_one(
                doc! { "_id": id },
                doc! { "$addToSet": { "upvotes": user } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn remove_upvote(&self, id: ObjectId, user: ObjectId) -> Result<()> {
        self.posts()
            .update_one(doc! { "_id": id }, doc! { "$pull": { "upvotes": user } }, None)
            .await?;
        Ok(())
    }

    pub async fn push_answer(&self, id: ObjectId, comment: ObjectId) -> Result<()> {
        self.posts()
            .update_one(
                doc! { "_id": id },
                doc! { "$push": { "answers": comment } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn pull_answer(&self, id: ObjectId, comment: ObjectId) -> Result<()> {
        self.posts()
            .update_one(doc! { "_id": id }, doc! { "$pull": { "answers": comment } }, None)
            .await?;
        Ok(())
    }

    /// Delete every comment of the post, then the post; returns the comment count removed
    pub async fn delete_with_comments(&self, id: ObjectId) -> Result<u64> {
        let comments = self
            .db
            .collection::<Document>(COMMENTS)
            .delete_many(doc! { "post": id }, None)
            .await?;
        self.posts().delete_one(doc! { "_id": id }, None).await?;

        Ok(comments.deleted_count)
    }

    /// Case-insensitive title match or exact tag
    pub async fn search(&self, pattern: &Regex, tag: &str) -> Result<Vec<PostHit>> {
        let pipeline = Pipeline::new()
            .match_(doc! { "$or": [
                { "title": Bson::RegularExpression(pattern.clone()) },
                { "tags": { "$in": [tag] } },
            ]})
            .project(doc! {
                "_id": 1,
                "title": 1,
                "content": 1,
                "upvotes": expr::size_of("upvotes"),
                "answers": expr::size_of("answers"),
            });

        self.db.aggregate(POSTS, pipeline).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_names(pipeline: &Pipeline) -> Vec<String> {
        pipeline
            .stages()
            .iter()
            .map(|s| s.keys().next().cloned().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_feed_stage_order() {
        let pipeline = feed_pipeline(
            FeedKind::New,
            ObjectId::new(),
            None,
            ObjectId::new(),
            Page::new(2, 10).unwrap(),
        );

        assert_eq!(
            stage_names(&pipeline),
            vec!["$match", "$project", "$lookup", "$lookup", "$sort", "$skip", "$limit", "$addFields"]
        );
        assert_eq!(pipeline.stages()[5], doc! { "$skip": 10_i64 });
    }

    #[test]
    fn test_personal_feed_filters_authors() {
        let community = ObjectId::new();
        let followed = vec![ObjectId::new(), ObjectId::new()];
        let pipeline = feed_pipeline(
            FeedKind::Personal,
            community,
            Some(&followed),
            ObjectId::new(),
            Page::new(1, 10).unwrap(),
        );

        let filter = pipeline.stages()[0].get_document("$match").unwrap();
        assert_eq!(filter.get_object_id("community").unwrap(), community);
        let authors = filter.get_document("author").unwrap().get_array("$in").unwrap();
        assert_eq!(authors.len(), 2);
    }

    #[test]
    fn test_liked_sorts_by_upvotes_then_date() {
        let keys: Vec<String> = FeedKind::Liked.sort().keys().cloned().collect();
        assert_eq!(keys, vec!["upvotes", "date", "_id"]);

        let keys: Vec<String> = FeedKind::New.sort().keys().cloned().collect();
        assert_eq!(keys, vec!["date", "_id"]);
    }

    #[test]
    fn test_feed_kind_parse() {
        assert_eq!(FeedKind::parse("personal"), Some(FeedKind::Personal));
        assert_eq!(FeedKind::parse("liked"), Some(FeedKind::Liked));
        assert_eq!(FeedKind::parse("hot"), None);
    }

    #[test]
    fn test_projection_counts_arrays() {
        let viewer = ObjectId::new();
        let pipeline = view_pipeline(doc! {}, viewer);
        let projection = pipeline.stages()[1].get_document("$project").unwrap();

        assert_eq!(
            projection.get_document("upvoted").unwrap(),
            &expr::contains(viewer, "upvotes")
        );
        assert_eq!(
            projection.get_document("answers").unwrap(),
            &expr::size_of("answers")
        );
    }
}
