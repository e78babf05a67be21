/// Justhink API Library
///
/// REST backend for the Justhink social app: users, posts, comments,
/// communities, search, notifications and image upload, stored in MongoDB
/// with push delivery through Firebase Cloud Messaging.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers, one module per resource
/// - `services`: Business logic, notification dispatch, search fan-out
/// - `db`: MongoDB access, typed aggregation pipelines and repositories
/// - `models`: Stored documents and response views
/// - `middleware`: Caller identity extraction and ownership checks
/// - `i18n`: Localized notification texts
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
