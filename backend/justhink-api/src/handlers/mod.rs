/// HTTP handlers, one module per resource
///
/// Handlers parse path and body input, call the matching service and shape
/// the JSON response. Failures are `AppError`s rendered as `{"message": ...}`.
pub mod auth;
pub mod comments;
pub mod communities;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod search;
pub mod upload;
pub mod users;

use actix_web::HttpResponse;
use bson::oid::ObjectId;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// `{"_id": "<hex>"}` body shared by the action endpoints
#[derive(Debug, Deserialize)]
pub struct IdBody {
    #[serde(rename = "_id", default)]
    pub id: String,
}

impl IdBody {
    pub fn object_id(&self) -> Result<ObjectId> {
        parse_id(&self.id)
    }
}

/// Parse a hex id from a path segment or body field
pub fn parse_id(raw: &str) -> Result<ObjectId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("ID is not given".to_string()));
    }
    Ok(ObjectId::parse_str(raw)?)
}

/// `{"message": "OK"}`
pub fn ok() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "OK" }))
}
