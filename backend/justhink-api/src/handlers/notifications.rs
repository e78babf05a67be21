/// Notification handlers - own notification list and manual sends
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::collections::HashMap;

use super::parse_id;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::NotificationPayload;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl SendRequest {
    fn into_payload(self) -> Result<NotificationPayload> {
        let missing = || AppError::Validation("Missing Parameters".to_string());
        let title = self.title.filter(|t| !t.is_empty()).ok_or_else(missing)?;
        let body = self.body.filter(|b| !b.is_empty()).ok_or_else(missing)?;

        Ok(NotificationPayload {
            title,
            body,
            data: self.data,
        })
    }
}

/// GET /notification/
pub async fn list(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    let notifications = state.notifications.list(user.0).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

/// POST /notification/send/u/{username}
pub async fn send_by_username(
    state: web::Data<AppState>,
    _user: CurrentUser,
    username: web::Path<String>,
    req: web::Json<SendRequest>,
) -> Result<HttpResponse> {
    let payload = req.into_inner().into_payload()?;
    let message = state
        .notifications
        .send_to_username(&username, payload)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": message })))
}

/// POST /notification/send/id/{id}
pub async fn send_by_id(
    state: web::Data<AppState>,
    _user: CurrentUser,
    id: web::Path<String>,
    req: web::Json<SendRequest>,
) -> Result<HttpResponse> {
    let payload = req.into_inner().into_payload()?;
    let message = state.notifications.send(parse_id(&id)?, payload).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_body_required() {
        let req = SendRequest {
            title: Some("Hi".into()),
            body: None,
            data: HashMap::new(),
        };
        let err = req.into_payload().unwrap_err();
        assert_eq!(err.to_string(), "Missing Parameters");
    }
}
