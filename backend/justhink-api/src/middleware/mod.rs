/// Request-scoped identity and ownership checks
///
/// Token verification itself lives in the shared `actix-middleware` crate;
/// this module turns the verified subject into a typed user id.
pub mod permissions;

pub use permissions::*;

use actix_middleware::{AuthError, UserId};
use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};
use bson::oid::ObjectId;
use std::future::{ready, Ready};

/// Authenticated caller, parsed from the token subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub ObjectId);

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<UserId>() {
            Some(UserId(sub)) => ObjectId::parse_str(sub)
                .map(CurrentUser)
                .map_err(|_| AuthError("Invalid token").into()),
            None => Err(AuthError("User not authenticated").into()),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use crypto_core::JwtKeys;
    use std::sync::Arc;

    async fn whoami(user: CurrentUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.to_hex())
    }

    #[actix_web::test]
    async fn test_subject_parsed_as_object_id() {
        let keys = Arc::new(JwtKeys::new("current-user-secret", None));
        let id = ObjectId::new();
        let token = keys.generate(&id.to_hex()).unwrap();
        let app = test::init_service(
            App::new()
                .wrap(actix_middleware::JwtAuthMiddleware::new(keys.clone()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], id.to_hex().as_bytes());
    }

    #[actix_web::test]
    async fn test_non_object_id_subject_rejected() {
        let keys = Arc::new(JwtKeys::new("current-user-secret", None));
        let token = keys.generate("not-an-object-id").unwrap();
        let app = test::init_service(
            App::new()
                .wrap(actix_middleware::JwtAuthMiddleware::new(keys.clone()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
