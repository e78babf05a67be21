/// Health check
use actix_web::{web, HttpResponse};

use crate::AppState;

/// GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.db.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "justhink-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("MongoDB ping failed: {}", e),
            "service": "justhink-api",
        })),
    }
}
