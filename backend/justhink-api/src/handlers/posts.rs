/// Post handlers - HTTP endpoints for posts and feeds
use actix_web::{web, HttpResponse};

use super::{ok, parse_id, IdBody};
use crate::db::post_repo::FeedKind;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Created;
use crate::services::{NewPost, VoteAction};
use crate::AppState;

/// POST /posts/create
pub async fn create_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<NewPost>,
) -> Result<HttpResponse> {
    let id = state.posts.create(user.0, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Created::from(id)))
}

/// GET /posts/find/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let post = state.posts.find(parse_id(&id)?, user.0).await?;
    Ok(HttpResponse::Ok().json(post))
}

async fn feed(
    state: web::Data<AppState>,
    user: CurrentUser,
    kind: FeedKind,
    page: i64,
) -> Result<HttpResponse> {
    let posts = state.posts.feed(kind, user.0, page).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/personal/{page}
pub async fn personal_feed(
    state: web::Data<AppState>,
    user: CurrentUser,
    page: web::Path<i64>,
) -> Result<HttpResponse> {
    feed(state, user, FeedKind::Personal, page.into_inner()).await
}

/// GET /posts/new/{page}
pub async fn new_feed(
    state: web::Data<AppState>,
    user: CurrentUser,
    page: web::Path<i64>,
) -> Result<HttpResponse> {
    feed(state, user, FeedKind::New, page.into_inner()).await
}

/// GET /posts/liked/{page}
pub async fn liked_feed(
    state: web::Data<AppState>,
    user: CurrentUser,
    page: web::Path<i64>,
) -> Result<HttpResponse> {
    feed(state, user, FeedKind::Liked, page.into_inner()).await
}

/// GET /posts/delete/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    state.posts.delete(parse_id(&id)?, user.0).await?;
    Ok(ok())
}

/// POST /posts/action/{upvote|downvote}
pub async fn action(
    state: web::Data<AppState>,
    user: CurrentUser,
    action: web::Path<String>,
    req: web::Json<IdBody>,
) -> Result<HttpResponse> {
    let action = VoteAction::parse(&action)?;
    state.posts.vote(action, req.object_id()?, user.0).await?;
    Ok(ok())
}
