use thiserror::Error;

/// Push delivery failures
#[derive(Error, Debug)]
pub enum FCMError {
    #[error("cannot read service account {path}: {reason}")]
    CredentialsRead { path: String, reason: String },

    #[error("invalid service account: {0}")]
    CredentialsParse(String),

    /// Signing the OAuth assertion or exchanging it for an access token failed
    #[error("OAuth token exchange failed: {0}")]
    Auth(String),

    #[error("push request failed: {0}")]
    Transport(String),

    #[error("FCM rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("device token is empty")]
    InvalidToken,
}
