/// Credential check and token issuance
use crypto_core::{verify_password, JwtKeys};
use serde::Serialize;
use std::sync::Arc;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::AuthProfile;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthProfile,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    keys: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(users: UserRepository, keys: Arc<JwtKeys>) -> Self {
        Self { users, keys }
    }

    /// Verify `username`/`password` and issue a bearer token for the user
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password)? {
            tracing::info!(username = %username, "login rejected");
            return Err(invalid());
        }

        let id = user.id.ok_or_else(invalid)?;
        let token = self.keys.generate(&id.to_hex())?;

        tracing::info!(user = %id, "login succeeded");
        Ok(LoginResponse {
            token,
            user: AuthProfile::from(&user),
        })
    }
}
