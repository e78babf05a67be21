/// Auth handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let response = state.auth.login(&req.username, &req.password).await?;
    Ok(HttpResponse::Ok().json(response))
}
