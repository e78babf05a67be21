use bson::serde_helpers::serialize_bson_datetime_as_rfc3339_string;
use bson::{DateTime, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Notification embedded in `users.notifications`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: Document,
    #[serde(default)]
    pub opened: bool,
    pub date: DateTime,
}

impl Notification {
    pub fn from_payload(payload: &NotificationPayload) -> Self {
        let mut data = Document::new();
        for (key, value) in &payload.data {
            data.insert(key.clone(), value.clone());
        }

        Self {
            title: payload.title.clone(),
            body: payload.body.clone(),
            data,
            opened: false,
            date: DateTime::now(),
        }
    }
}

/// Title, body and extra key/value data of one notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

/// Notification as listed back to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationView {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: Document,
    #[serde(default)]
    pub opened: bool,
    #[serde(serialize_with = "serialize_bson_datetime_as_rfc3339_string")]
    pub date: DateTime,
}
