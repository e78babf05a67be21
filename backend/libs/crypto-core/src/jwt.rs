/// Bearer token signing and validation
///
/// Tokens are signed with HS256 using the service's shared secret. The claims
/// are minimal: the subject id and the issue time, plus an expiry
/// when the keys were built with a TTL. Anything else about the caller is
/// looked up per request.
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::JwtKeys;
///
/// let keys = JwtKeys::new("change-me", None);
/// let token = keys.generate("60049bc9888d8b3284e5cb4f").unwrap();
/// let data = keys.validate(&token).unwrap();
/// assert_eq!(data.claims.sub, "60049bc9888d8b3284e5cb4f");
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
    Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims: subject id plus timestamps
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user id as hex string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp), absent for time-unbounded tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    Encode(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Signing material for one service instance
///
/// Built once at startup from configuration and shared behind an `Arc`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").field("ttl", &self.ttl).finish()
    }
}

impl JwtKeys {
    /// Create keys from the shared secret.
    ///
    /// `ttl` of `None` issues tokens without an `exp` claim.
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for `subject`
    pub fn generate(&self, subject: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encode(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn validate(&self, token: &str) -> Result<TokenData<Claims>, JwtError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.required_spec_claims.clear();
        if self.ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECT: &str = "60049bc9888d8b3284e5cb4f";

    #[test]
    fn test_generate_and_validate() {
        let keys = JwtKeys::new("test-secret", None);
        let token = keys.generate(SUBJECT).unwrap();

        assert_eq!(token.matches('.').count(), 2);

        let data = keys.validate(&token).unwrap();
        assert_eq!(data.claims.sub, SUBJECT);
        assert_eq!(data.claims.exp, None);
        assert_eq!(data.header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_ttl_sets_expiry() {
        let keys = JwtKeys::new("test-secret", Some(Duration::hours(1)));
        let token = keys.generate(SUBJECT).unwrap();
        let claims = keys.validate(&token).unwrap().claims;

        let exp = claims.exp.expect("exp should be set");
        assert_eq!(exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtKeys::new("secret-a", None);
        let verifier = JwtKeys::new("secret-b", None);
        let token = issuer.generate(SUBJECT).unwrap();

        assert!(matches!(verifier.validate(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let keys = JwtKeys::new("test-secret", None);
        let token = keys.generate(SUBJECT).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = keys.generate("000000000000000000000000").unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;
        let tampered = parts.join(".");

        assert!(keys.validate(&tampered).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = JwtKeys::new("test-secret", Some(Duration::hours(1)));
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: SUBJECT.to_string(),
            iat: past.timestamp(),
            exp: Some((past + Duration::minutes(1)).timestamp()),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(keys.validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_ttl_keys_require_exp() {
        let unbounded = JwtKeys::new("test-secret", None);
        let bounded = JwtKeys::new("test-secret", Some(Duration::hours(1)));
        let token = unbounded.generate(SUBJECT).unwrap();

        assert!(bounded.validate(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let keys = JwtKeys::new("test-secret", None);
        assert!(keys.validate("not.a.token").is_err());
        assert!(keys.validate("").is_err());
    }
}
