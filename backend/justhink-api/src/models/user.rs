use bson::oid::ObjectId;
use bson::serde_helpers::serialize_object_id_as_hex_string;
use serde::{Deserialize, Serialize};

use super::Notification;

pub const DEFAULT_USER_IMAGE: &str = "https://justhink.s3.eu-central-1.amazonaws.com/default-user.png";
pub const DEFAULT_LANGUAGE: &str = "tr";

/// `users` collection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub fullname: String,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub rank: i32,
    #[serde(rename = "type", default)]
    pub user_type: i32,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub followers: Vec<ObjectId>,
    #[serde(default)]
    pub follows: Vec<ObjectId>,
    #[serde(default)]
    pub communities: Vec<ObjectId>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(rename = "FCMToken", default, skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
}

impl User {
    /// New account with signup defaults
    pub fn new(
        username: String,
        fullname: String,
        email: String,
        password_hash: String,
        language: Option<String>,
    ) -> Self {
        Self {
            id: None,
            username,
            fullname,
            email,
            password: password_hash,
            image: DEFAULT_USER_IMAGE.to_string(),
            bio: String::new(),
            verified: false,
            rank: 0,
            user_type: 0,
            language: language
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            followers: Vec::new(),
            follows: Vec::new(),
            communities: Vec::new(),
            notifications: Vec::new(),
            fcm_token: None,
        }
    }

    /// "fullname (@username)", as shown in notification texts
    pub fn display_name(&self) -> String {
        format!("{} (@{})", self.fullname, self.username)
    }
}

/// Profile as seen by another user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub username: String,
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub verified: bool,
    /// Whether the viewer follows this user
    #[serde(default)]
    pub followed: bool,
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub follows: i64,
}

/// Profile returned at login, password stripped
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub image: String,
    pub bio: String,
    pub verified: bool,
    pub language: String,
    pub followers: usize,
    pub follows: usize,
}

impl From<&User> for AuthProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            bio: user.bio.clone(),
            verified: user.verified,
            language: user.language.clone(),
            followers: user.followers.len(),
            follows: user.follows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_defaults() {
        let user = User::new(
            "ada".into(),
            "Ada Lovelace".into(),
            "ada@example.com".into(),
            "$argon2id$hash".into(),
            None,
        );

        assert_eq!(user.image, DEFAULT_USER_IMAGE);
        assert_eq!(user.language, "tr");
        assert_eq!(user.rank, 0);
        assert_eq!(user.user_type, 0);
        assert!(!user.verified);
        assert!(user.followers.is_empty() && user.follows.is_empty());
        assert!(user.communities.is_empty() && user.notifications.is_empty());
        assert_eq!(user.display_name(), "Ada Lovelace (@ada)");
    }

    #[test]
    fn test_stored_field_names() {
        let mut user = User::new("a".into(), "A".into(), "a@x".into(), "h".into(), Some("en".into()));
        user.fcm_token = Some("device".into());
        let doc = bson::to_document(&user).unwrap();

        assert!(doc.get("_id").is_none());
        assert_eq!(doc.get_str("FCMToken").unwrap(), "device");
        assert_eq!(doc.get_i32("type").unwrap(), 0);
        assert_eq!(doc.get_str("language").unwrap(), "en");
    }

    #[test]
    fn test_auth_profile_strips_password() {
        let mut user = User::new("a".into(), "A".into(), "a@x".into(), "secret-hash".into(), None);
        user.id = Some(ObjectId::new());
        user.followers.push(ObjectId::new());

        let json = serde_json::to_value(AuthProfile::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["followers"], 1);
        assert_eq!(json["_id"], user.id.unwrap().to_hex());
    }
}
