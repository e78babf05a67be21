/// FCM client library
///
/// Firebase Cloud Messaging (HTTP v1) client used by the Justhink services to
/// push notifications to devices.
///
/// It handles:
/// - OAuth2 token generation from a Google service-account key
/// - Token caching with automatic refresh
/// - Single-device message delivery with Android priority and data payload

pub mod client;
pub mod errors;
pub mod models;

pub use client::FCMClient;
pub use errors::FCMError;
pub use models::{FCMSendResult, ServiceAccountKey};
