/// Search handler
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::AppState;

/// GET /search/content/{query}
pub async fn search_content(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Path<String>,
) -> Result<HttpResponse> {
    let response = state.search.search(&query).await?;
    Ok(HttpResponse::Ok().json(response))
}
