/// Route table
///
/// Public: `/health`, `/auth/login`, `/users/exists/..`, `/users/signup`.
/// Everything else sits behind `JwtAuthMiddleware`.
use actix_middleware::JwtAuthMiddleware;
use actix_web::{error::InternalError, web, HttpRequest, HttpResponse};
use crypto_core::JwtKeys;
use std::sync::Arc;

use crate::handlers;

const JSON_LIMIT: usize = 1024 * 1024;

fn bad_request<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    let response =
        HttpResponse::BadRequest().json(serde_json::json!({ "message": err.to_string() }));
    InternalError::from_response(err, response).into()
}

/// Body and path extractor settings with `{"message"}` error bodies
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(bad_request),
    )
    .app_data(web::PathConfig::default().error_handler(bad_request));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, keys: Arc<JwtKeys>) {
    configure_extractors(cfg);

    cfg.route("/health", web::get().to(handlers::health::health))
        .service(web::scope("/auth").route("/login", web::post().to(handlers::auth::login)))
        .service(
            web::resource("/users/exists/{type}/{query}")
                .route(web::get().to(handlers::users::exists)),
        )
        .service(web::resource("/users/signup").route(web::post().to(handlers::users::signup)))
        .service(
            web::scope("")
                .wrap(JwtAuthMiddleware::new(keys))
                .service(
                    web::scope("/users")
                        .route("/find/{id}", web::get().to(handlers::users::find_user))
                        .route("/edit", web::post().to(handlers::users::edit))
                        .route(
                            "/updateFCMToken",
                            web::post().to(handlers::users::update_fcm_token),
                        )
                        .route("/action/{action}", web::post().to(handlers::users::action)),
                )
                .service(
                    web::scope("/posts")
                        .route("/create", web::post().to(handlers::posts::create_post))
                        .route("/find/{id}", web::get().to(handlers::posts::get_post))
                        .route("/personal/{page}", web::get().to(handlers::posts::personal_feed))
                        .route("/new/{page}", web::get().to(handlers::posts::new_feed))
                        .route("/liked/{page}", web::get().to(handlers::posts::liked_feed))
                        .route("/delete/{id}", web::get().to(handlers::posts::delete_post))
                        .route("/action/{action}", web::post().to(handlers::posts::action)),
                )
                .service(
                    web::scope("/comments")
                        .route("/of/{id}/{page}", web::get().to(handlers::comments::of_post))
                        .route("/create", web::post().to(handlers::comments::create_comment))
                        .route("/delete/{id}", web::get().to(handlers::comments::delete_comment))
                        .route("/action/{action}", web::post().to(handlers::comments::action)),
                )
                .service(
                    web::scope("/communities")
                        .route(
                            "/create",
                            web::post().to(handlers::communities::create_community),
                        )
                        .route("/find/{id}", web::get().to(handlers::communities::get_community))
                        .route("/of/{id}", web::get().to(handlers::communities::of_member))
                        .route("/action/{action}", web::post().to(handlers::communities::action)),
                )
                .service(
                    web::scope("/search").route(
                        "/content/{query}",
                        web::get().to(handlers::search::search_content),
                    ),
                )
                .service(
                    web::scope("/notification")
                        .route("/", web::get().to(handlers::notifications::list))
                        .route(
                            "/send/u/{username}",
                            web::post().to(handlers::notifications::send_by_username),
                        )
                        .route(
                            "/send/id/{id}",
                            web::post().to(handlers::notifications::send_by_id),
                        ),
                )
                .service(
                    web::scope("/upload")
                        .route("/", web::post().to(handlers::upload::upload_image)),
                ),
        );
}
