/// Community handlers
use actix_web::{web, HttpResponse};

use super::{ok, parse_id, IdBody};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Created;
use crate::services::{MembershipAction, NewCommunity};
use crate::AppState;

/// POST /communities/create
pub async fn create_community(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<NewCommunity>,
) -> Result<HttpResponse> {
    let id = state.communities.create(user.0, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Created::from(id)))
}

/// GET /communities/find/{id}
pub async fn get_community(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let community = state.communities.find(parse_id(&id)?, user.0).await?;
    Ok(HttpResponse::Ok().json(community))
}

/// GET /communities/of/{id}
pub async fn of_member(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let communities = state.communities.of_member(parse_id(&id)?, user.0).await?;
    Ok(HttpResponse::Ok().json(communities))
}

/// POST /communities/action/{join|leave}
pub async fn action(
    state: web::Data<AppState>,
    user: CurrentUser,
    action: web::Path<String>,
    req: web::Json<IdBody>,
) -> Result<HttpResponse> {
    let action = MembershipAction::parse(&action)?;
    state
        .communities
        .membership_action(action, req.object_id()?, user.0)
        .await?;
    Ok(ok())
}
