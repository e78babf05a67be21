use bson::oid::ObjectId;
use bson::serde_helpers::{
    serialize_bson_datetime_as_rfc3339_string, serialize_object_id_as_hex_string,
};
use bson::{Bson, DateTime};
use serde::{Deserialize, Serialize};

use super::{serialize_optional_oid, AuthorSummary};

/// `comments` collection document
///
/// Replies are stored as their own documents and also embedded into the
/// parent's `answers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post: ObjectId,
    pub author: ObjectId,
    pub date: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectId>,
    pub content: Vec<Bson>,
    #[serde(default)]
    pub upvotes: Vec<ObjectId>,
    #[serde(default)]
    pub answers: Vec<Comment>,
}

/// Comment as returned by the per-post listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub post: ObjectId,
    #[serde(default, serialize_with = "serialize_optional_oid")]
    pub parent: Option<ObjectId>,
    #[serde(default)]
    pub content: Vec<Bson>,
    #[serde(serialize_with = "serialize_bson_datetime_as_rfc3339_string")]
    pub date: DateTime,
    #[serde(default)]
    pub author: Option<AuthorSummary>,
    #[serde(default)]
    pub upvoted: bool,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub answers: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_embeds_recursively() {
        let post = ObjectId::new();
        let author = ObjectId::new();
        let reply = Comment {
            id: Some(ObjectId::new()),
            post,
            author,
            date: DateTime::now(),
            parent: None,
            content: vec![Bson::String("child".into())],
            upvotes: vec![],
            answers: vec![],
        };
        let parent = Comment {
            answers: vec![reply.clone()],
            ..reply.clone()
        };

        let doc = bson::to_document(&parent).unwrap();
        assert!(doc.get("parent").is_none());
        let answers = doc.get_array("answers").unwrap();
        assert_eq!(answers.len(), 1);

        let back: Comment = bson::from_document(doc).unwrap();
        assert_eq!(back.answers[0].id, reply.id);
    }
}
