use bson::oid::ObjectId;
use bson::serde_helpers::serialize_object_id_as_hex_string;
use serde::{Deserialize, Serialize};

use super::AuthorSummary;

pub const DEFAULT_COMMUNITY_IMAGE: &str =
    "https://justhink.s3.eu-central-1.amazonaws.com/default-community.png";
pub const DEFAULT_COMMUNITY_BANNER: &str =
    "https://justhink.s3.eu-central-1.amazonaws.com/default-community-banner.png";

/// `communities` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub bio: String,
    pub founder: ObjectId,
    #[serde(default)]
    pub mods: Vec<ObjectId>,
    #[serde(default)]
    pub members: Vec<ObjectId>,
    pub image: String,
    pub banner: String,
}

impl Community {
    /// Founder starts as the only mod and member; unset imagery gets placeholders
    pub fn found(
        founder: ObjectId,
        title: String,
        bio: String,
        image: Option<String>,
        banner: Option<String>,
    ) -> Self {
        let or_default = |value: Option<String>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            id: None,
            title,
            bio,
            founder,
            mods: vec![founder],
            members: vec![founder],
            image: or_default(image, DEFAULT_COMMUNITY_IMAGE),
            banner: or_default(banner, DEFAULT_COMMUNITY_BANNER),
        }
    }
}

/// Community as returned by fetch and membership listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityView {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub banner: String,
    /// Whether the viewer is a member
    #[serde(default)]
    pub joined: bool,
    #[serde(default)]
    pub members: i64,
    #[serde(default)]
    pub founder: Option<AuthorSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founder_seeded() {
        let founder = ObjectId::new();
        let community = Community::found(founder, "Rust".into(), "All things Rust".into(), None, Some("  ".into()));

        assert_eq!(community.mods, vec![founder]);
        assert_eq!(community.members, vec![founder]);
        assert_eq!(community.image, DEFAULT_COMMUNITY_IMAGE);
        assert_eq!(community.banner, DEFAULT_COMMUNITY_BANNER);
    }

    #[test]
    fn test_custom_imagery_kept() {
        let community = Community::found(
            ObjectId::new(),
            "Rust".into(),
            "bio".into(),
            Some("https://cdn/x.png".into()),
            None,
        );
        assert_eq!(community.image, "https://cdn/x.png");
    }
}
