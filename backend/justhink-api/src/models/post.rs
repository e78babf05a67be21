use bson::oid::ObjectId;
use bson::serde_helpers::{
    serialize_bson_datetime_as_rfc3339_string, serialize_object_id_as_hex_string,
};
use bson::{Bson, DateTime};
use serde::{Deserialize, Serialize};

/// `posts` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// Rich content blocks as sent by the editor
    pub content: Vec<Bson>,
    pub author: ObjectId,
    pub community: ObjectId,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub upvotes: Vec<ObjectId>,
    /// Comment ids
    #[serde(default)]
    pub answers: Vec<ObjectId>,
    pub date: DateTime,
}

/// Joined author fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorSummary {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub verified: bool,
}

/// Joined community fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunitySummary {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub members: i64,
}

/// Post as returned by fetch and feed queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub content: Vec<Bson>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(serialize_with = "serialize_bson_datetime_as_rfc3339_string")]
    pub date: DateTime,
    #[serde(default)]
    pub author: Option<AuthorSummary>,
    #[serde(default)]
    pub community: Option<CommunitySummary>,
    /// Whether the viewer upvoted the post
    #[serde(default)]
    pub upvoted: bool,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub answers: i64,
}
