use bson::oid::ObjectId;
use bson::serde_helpers::serialize_object_id_as_hex_string;
use bson::Bson;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHit {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub username: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub followers: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostHit {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub content: Vec<Bson>,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub answers: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityHit {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub members: i64,
}

/// Combined search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total hits across the three collections
    pub length: usize,
    pub users: Vec<UserHit>,
    pub posts: Vec<PostHit>,
    pub communities: Vec<CommunityHit>,
}

impl SearchResponse {
    pub fn new(users: Vec<UserHit>, posts: Vec<PostHit>, communities: Vec<CommunityHit>) -> Self {
        Self {
            length: users.len() + posts.len() + communities.len(),
            users,
            posts,
            communities,
        }
    }
}
