/// User handlers - profiles, registration and the follow graph
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{ok, parse_id, IdBody};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Created;
use crate::services::{FollowAction, LookupField, Signup, UserPatch};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FcmTokenRequest {
    #[serde(default)]
    pub token: String,
}

/// GET /users/find/{id}
pub async fn find_user(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    let profile = state.users.profile(id, user.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /users/exists/{type}/{query}
pub async fn exists(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (field, query) = path.into_inner();
    let found = state.users.exists(LookupField::parse(&field)?, &query).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "found": found })))
}

/// POST /users/signup
pub async fn signup(
    state: web::Data<AppState>,
    req: web::Json<Signup>,
) -> Result<HttpResponse> {
    let id = state.users.signup(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Created::from(id)))
}

/// POST /users/edit
pub async fn edit(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<UserPatch>,
) -> Result<HttpResponse> {
    state.users.edit(user.0, &req).await?;
    Ok(ok())
}

/// POST /users/updateFCMToken
pub async fn update_fcm_token(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<FcmTokenRequest>,
) -> Result<HttpResponse> {
    state.users.update_fcm_token(user.0, &req.token).await?;
    Ok(ok())
}

/// POST /users/action/{follow|unfollow}
pub async fn action(
    state: web::Data<AppState>,
    user: CurrentUser,
    action: web::Path<String>,
    req: web::Json<IdBody>,
) -> Result<HttpResponse> {
    let action = FollowAction::parse(&action)?;
    let target = req.object_id()?;

    state.users.follow_action(action, user.0, target).await?;
    Ok(ok())
}
