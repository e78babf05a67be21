//! # Actix Middleware Library
//!
//! Shared middleware for the Justhink actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer-token authentication and the `UserId` extractor
//! - `logging`: request/response logging through tracing

pub mod jwt_auth;
pub mod logging;

pub use jwt_auth::{AuthError, JwtAuthMiddleware, UserId};
pub use logging::Logging;
