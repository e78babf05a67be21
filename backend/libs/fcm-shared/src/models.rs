use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a delivered push
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FCMSendResult {
    /// Provider message name, e.g. `projects/p/messages/123`
    pub message_id: String,
}

/// Firebase Service Account Key, as downloaded from the Firebase console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Access token kept between sends
#[derive(Debug, Clone)]
pub(crate) struct CachedToken {
    pub access_token: String,
    pub expires_at: i64,
}

impl CachedToken {
    /// Margin before expiry at which the token is refreshed
    const REFRESH_MARGIN_SECS: i64 = 60;

    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at > now + Self::REFRESH_MARGIN_SECS
    }
}

/// Assertion claims signed with the service-account key
#[derive(Debug, Serialize)]
pub(crate) struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// HTTP v1 `messages:send` body
#[derive(Debug, Serialize)]
pub struct FcmMessage {
    pub message: FcmMessageContent,
}

#[derive(Debug, Serialize)]
pub struct FcmMessageContent {
    pub token: String,
    pub notification: FcmNotification,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,
}

/// Title/body shown by the device
#[derive(Debug, Serialize)]
pub struct FcmNotification {
    pub title: String,
    pub body: String,
}

/// Android delivery options
#[derive(Debug, Serialize)]
pub struct AndroidConfig {
    pub priority: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FcmApiResponse {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_refreshes_near_expiry() {
        let token = CachedToken {
            access_token: "t".into(),
            expires_at: 1_000,
        };
        assert!(token.is_fresh(900));
        assert!(!token.is_fresh(940));
        assert!(!token.is_fresh(1_000));
    }
}
