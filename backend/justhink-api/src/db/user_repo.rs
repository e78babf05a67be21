/// User repository - documents in the `users` collection
use bson::{doc, oid::ObjectId, Bson, Document, Regex};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOneOptions;
use serde::Deserialize;

use super::{expr, Database, Pipeline, USERS};
use crate::error::{AppError, Result};
use crate::models::{Notification, NotificationView, User, UserHit, UserProfile};

/// Push token and language of a notification target
#[derive(Debug, Clone, Deserialize)]
pub struct Recipient {
    #[serde(rename = "FCMToken", default)]
    pub fcm_token: Option<String>,
    #[serde(default)]
    pub language: String,
}

const DUPLICATE_KEY: i32 = 11000;

/// Server message of a unique-index violation
fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            Some(e.message.as_str())
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY => Some(e.message.as_str()),
        _ => None,
    }
}

/// Conflict for the unique index named in a duplicate-key message
fn duplicate_conflict(message: &str) -> AppError {
    let index = message
        .split("index: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default();
    if index.starts_with("email") {
        AppError::Conflict("Email already registered".to_string())
    } else {
        AppError::Conflict("Username already taken".to_string())
    }
}

/// Duplicate-key write errors become 409
fn map_write_error(err: mongodb::error::Error) -> AppError {
    match duplicate_key_message(&err) {
        Some(message) => duplicate_conflict(message),
        None => err.into(),
    }
}

#[derive(Deserialize)]
struct FollowState {
    followed: bool,
}

#[derive(Deserialize)]
struct NotificationFeed {
    #[serde(default)]
    notifications: Vec<NotificationView>,
}

#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> mongodb::Collection<User> {
        self.db.collection(USERS)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users()
            .find_one(doc! { "username": username }, None)
            .await?)
    }

    pub async fn id_by_username(&self, username: &str) -> Result<Option<ObjectId>> {
        self.id_by_field("username", username).await
    }

    /// Id of the user with `field == value`
    pub async fn id_by_field(&self, field: &str, value: &str) -> Result<Option<ObjectId>> {
        #[derive(Deserialize)]
        struct IdOnly {
            #[serde(rename = "_id")]
            id: ObjectId,
        }

        let mut filter = Document::new();
        filter.insert(field, value);

        let options = FindOneOptions::builder()
            .projection(doc! { "_id": 1 })
            .build();
        let found = self
            .db
            .collection::<IdOnly>(USERS)
            .find_one(filter, options)
            .await?;

        Ok(found.map(|row| row.id))
    }

    /// Whether any user has `field == value`
    pub async fn exists_by(&self, field: &str, value: &str) -> Result<bool> {
        let mut filter = Document::new();
        filter.insert(field, value);

        let count = self
            .db
            .collection::<Document>(USERS)
            .count_documents(filter, None)
            .await?;

        Ok(count > 0)
    }

    pub async fn insert(&self, user: &User) -> Result<ObjectId> {
        let result = self
            .users()
            .insert_one(user, None)
            .await
            .map_err(map_write_error)?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("insert returned a non-ObjectId key".to_string()))
    }

    /// Profile of `id` with the `followed` flag relative to `viewer`
    pub async fn profile(&self, id: ObjectId, viewer: ObjectId) -> Result<Option<UserProfile>> {
        let pipeline = Pipeline::new().match_(doc! { "_id": id }).project(doc! {
            "_id": 1,
            "username": 1,
            "fullname": 1,
            "email": 1,
            "image": 1,
            "bio": 1,
            "verified": 1,
            "followed": expr::contains(viewer, "followers"),
            "followers": expr::size_of("followers"),
            "follows": expr::size_of("follows"),
        });

        self.db.aggregate_one(USERS, pipeline).await
    }

    /// `Some(true)` if `follower` follows `target`, `None` if `target` is absent
    pub async fn follow_state(&self, follower: ObjectId, target: ObjectId) -> Result<Option<bool>> {
        let pipeline = Pipeline::new()
            .match_(doc! { "_id": target })
            .project(doc! { "followed": expr::contains(follower, "followers") });

        let state: Option<FollowState> = self.db.aggregate_one(USERS, pipeline).await?;
        Ok(state.map(|s| s.followed))
    }

    /// Returns whether a user matched
    pub async fn set_fields(&self, id: ObjectId, fields: Document) -> Result<bool> {
        let result = self
            .users()
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await
            .map_err(map_write_error)?;
        Ok(result.matched_count > 0)
    }

    pub async fn set_fcm_token(&self, id: ObjectId, token: &str) -> Result<bool> {
        self.set_fields(id, doc! { "FCMToken": token }).await
    }

    /// Record the follower/followee pair on both documents
    pub async fn add_follow(&self, follower: ObjectId, target: ObjectId) -> Result<()> {
        self.users()
            .update_one(
                doc! { "_id": target },
                doc! { "$addToSet": { "followers": follower } },
                None,
            )
            .await?;
        self.users()
            .update_one(
                doc! { "_id": follower },
                doc! { "$addToSet": { "follows": target } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn remove_follow(&self, follower: ObjectId, target: ObjectId) -> Result<()> {
        self.users()
            .update_one(
                doc! { "_id": target },
                doc! { "$pull": { "followers": follower } },
                None,
            )
            .await?;
        self.users()
            .update_one(
                doc! { "_id": follower },
                doc! { "$pull": { "follows": target } },
                None,
            )
            .await?;
        Ok(())
    }

    /// Ids `id` follows; empty when the user is absent
    pub async fn follows_of(&self, id: ObjectId) -> Result<Vec<ObjectId>> {
        #[derive(Deserialize)]
        struct Follows {
            #[serde(default)]
            follows: Vec<ObjectId>,
        }

        let options = FindOneOptions::builder()
            .projection(doc! { "follows": 1 })
            .build();
        let found = self
            .db
            .collection::<Follows>(USERS)
            .find_one(doc! { "_id": id }, options)
            .await?;

        Ok(found.map(|f| f.follows).unwrap_or_default())
    }

    pub async fn add_community(&self, id: ObjectId, community: ObjectId) -> Result<()> {
        self.users()
            .update_one(
                doc! { "_id": id },
                doc! { "$addToSet": { "communities": community } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn remove_community(&self, id: ObjectId, community: ObjectId) -> Result<()> {
        self.users()
            .update_one(
                doc! { "_id": id },
                doc! { "$pull": { "communities": community } },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn recipient(&self, id: ObjectId) -> Result<Option<Recipient>> {
        let options = FindOneOptions::builder()
            .projection(doc! { "FCMToken": 1, "language": 1 })
            .build();

        Ok(self
            .db
            .collection::<Recipient>(USERS)
            .find_one(doc! { "_id": id }, options)
            .await?)
    }

    pub async fn push_notification(&self, id: ObjectId, notification: &Notification) -> Result<()> {
        let entry = bson::to_bson(notification)?;
        self.users()
            .update_one(
                doc! { "_id": id },
                doc! { "$push": { "notifications": entry } },
                None,
            )
            .await?;
        Ok(())
    }

    /// Own notifications, newest first
    pub async fn notifications(&self, id: ObjectId) -> Result<Vec<NotificationView>> {
        let pipeline = Pipeline::new()
            .match_(doc! { "_id": id })
            .project(doc! { "notifications": 1 })
            .unwind("$notifications")
            .sort(doc! { "notifications.date": -1 })
            .group(doc! {
                "_id": "$_id",
                "notifications": { "$push": "$notifications" },
            });

        let feed: Option<NotificationFeed> = self.db.aggregate_one(USERS, pipeline).await?;
        Ok(feed.map(|f| f.notifications).unwrap_or_default())
    }

    /// Case-insensitive match on username or full name
    pub async fn search(&self, pattern: &Regex) -> Result<Vec<UserHit>> {
        let pattern = Bson::RegularExpression(pattern.clone());
        let pipeline = Pipeline::new()
            .match_(doc! { "$or": [
                { "username": pattern.clone() },
                { "fullname": pattern },
            ]})
            .project(doc! {
                "_id": 1,
                "username": 1,
                "fullname": 1,
                "image": 1,
                "verified": 1,
                "followers": expr::size_of("followers"),
            });

        self.db.aggregate(USERS, pipeline).await
    }
}
