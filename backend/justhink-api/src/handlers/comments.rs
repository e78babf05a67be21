/// Comment handlers
use actix_web::{web, HttpResponse};

use super::{ok, parse_id, IdBody};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Created;
use crate::services::{NewComment, VoteAction};
use crate::AppState;

/// GET /comments/of/{id}/{page}
pub async fn of_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let (post, page) = path.into_inner();
    let comments = state.comments.of_post(parse_id(&post)?, user.0, page).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /comments/create
pub async fn create_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<NewComment>,
) -> Result<HttpResponse> {
    let id = state.comments.create(user.0, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Created::from(id)))
}

/// GET /comments/delete/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    state.comments.delete(parse_id(&id)?, user.0).await?;
    Ok(ok())
}

/// POST /comments/action/{upvote|downvote}
pub async fn action(
    state: web::Data<AppState>,
    user: CurrentUser,
    action: web::Path<String>,
    req: web::Json<IdBody>,
) -> Result<HttpResponse> {
    let action = VoteAction::parse(&action)?;
    state.comments.vote(action, req.object_id()?, user.0).await?;
    Ok(ok())
}
