/// Community repository - documents in the `communities` collection
use bson::{doc, oid::ObjectId, Bson, Document, Regex};

use super::post_repo::author_lookup;
use super::{expr, Database, Pipeline, COMMUNITIES, USERS};
use crate::error::{AppError, Result};
use crate::models::{Community, CommunityHit, CommunityView};

fn view_pipeline(filter: Document, viewer: ObjectId) -> Pipeline {
    Pipeline::new()
        .match_(filter)
        .project(doc! {
            "_id": 1,
            "title": 1,
            "bio": 1,
            "image": 1,
            "banner": 1,
            "founder": 1,
            "joined": expr::contains(viewer, "members"),
            "members": expr::size_of("members"),
        })
        .lookup_pipeline(
            USERS,
            doc! { "author": "$founder" },
            author_lookup(),
            "founder",
        )
}

/// Communities `member` belongs to, largest first
pub fn of_member_pipeline(member: ObjectId, viewer: ObjectId) -> Pipeline {
    view_pipeline(doc! { "members": member }, viewer)
        .sort(doc! { "members": -1, "_id": 1 })
        .add_fields(doc! { "founder": expr::first("founder") })
}

#[derive(Clone)]
pub struct CommunityRepository {
    db: Database,
}

impl CommunityRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn communities(&self) -> mongodb::Collection<Community> {
        self.db.collection(COMMUNITIES)
    }

    pub async fn insert(&self, community: &Community) -> Result<ObjectId> {
        let result = self.communities().insert_one(community, None).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("insert returned a non-ObjectId key".to_string()))
    }

    pub async fn find_view(&self, id: ObjectId, viewer: ObjectId) -> Result<Option<CommunityView>> {
        let pipeline = view_pipeline(doc! { "_id": id }, viewer)
            .add_fields(doc! { "founder": expr::first("founder") });
        self.db.aggregate_one(COMMUNITIES, pipeline).await
    }

    pub async fn of_member(&self, member: ObjectId, viewer: ObjectId) -> Result<Vec<CommunityView>> {
        self.db
            .aggregate(COMMUNITIES, of_member_pipeline(member, viewer))
            .await
    }

    /// `None` when the community is absent, else whether `user` is a member
    pub async fn membership(&self, id: ObjectId, user: ObjectId) -> Result<Option<bool>> {
        let pipeline = Pipeline::new()
            .match_(doc! { "_id": id })
            .project(doc! { "joined": expr::contains(user, "members") });

        let row: Option<Document> = self.db.aggregate_one(COMMUNITIES, pipeline).await?;
        Ok(row.map(|r| r.get_bool("joined").unwrap_or(false)))
    }

    pub async fn add_member(&self, id: ObjectId, user: ObjectId) -> Result<()> {
        self.communities()
            .update_one(
                doc! { "_id": id },
                doc! { "$addToSet": { "members": user } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn remove_member(&self, id: ObjectId, user: ObjectId) -> Result<()> {
        self.communities()
            .update_one(doc! { "_id": id }, doc! { "$pull": { "members": user } }, None)
            .await?;
        Ok(())
    }

    pub async fn search(&self, pattern: &Regex) -> Result<Vec<CommunityHit>> {
        let pipeline = Pipeline::new()
            .match_(doc! { "title": Bson::RegularExpression(pattern.clone()) })
            .project(doc! {
                "_id": 1,
                "title": 1,
                "image": 1,
                "members": expr::size_of("members"),
            });

        self.db.aggregate(COMMUNITIES, pipeline).await
    }
}
