/// Stored documents and the views returned to clients
///
/// Stored types keep BSON-native ids and dates. View types are decoded from
/// aggregation output and serialize ids as hex strings and dates as RFC 3339.
pub mod comment;
pub mod community;
pub mod notification;
pub mod post;
pub mod search;
pub mod user;

pub use comment::{Comment, CommentView};
pub use community::{Community, CommunityView};
pub use notification::{Notification, NotificationPayload, NotificationView};
pub use post::{AuthorSummary, CommunitySummary, Post, PostView};
pub use search::{CommunityHit, PostHit, SearchResponse, UserHit};
pub use user::{AuthProfile, User, UserProfile};

use bson::oid::ObjectId;
use serde::Serializer;

pub(crate) fn serialize_optional_oid<S: Serializer>(
    value: &Option<ObjectId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// `{"_id": "<hex>"}` body returned after inserts
#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Created {
    #[serde(rename = "_id")]
    pub id: String,
}

impl From<ObjectId> for Created {
    fn from(id: ObjectId) -> Self {
        Self { id: id.to_hex() }
    }
}
