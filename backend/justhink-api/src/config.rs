/// Configuration management for the Justhink API
///
/// Everything is read from environment variables (optionally seeded from a
/// `.env` file by `main`).
use bson::oid::ObjectId;
use s3_utils::S3Config;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// MongoDB configuration
    pub database: DatabaseConfig,
    /// Token signing
    pub auth: AuthConfig,
    /// Object storage for uploads
    pub storage: S3Config,
    /// Push provider
    pub push: PushConfig,
    /// Feed settings
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for any
    pub allowed_origins: String,
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string
    pub url: String,
    /// Database name
    pub name: String,
    /// Connect / server selection timeout
    pub timeout_secs: u64,
    /// Server-side limit for aggregation pipelines
    pub aggregate_timeout_ms: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime; `None` issues tokens without expiry
    pub jwt_ttl_secs: Option<i64>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_ttl_secs", &self.jwt_ttl_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub enabled: bool,
    /// Path to the Firebase service-account JSON
    pub credentials_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size for feeds and comment lists
    pub post_limit: i64,
    /// Community every new post is filed under
    pub default_community: ObjectId,
}

const DEFAULT_COMMUNITY_ID: &str = "60049bc9888d8b3284e5cb4f";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV")
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => return Err("JWT_SECRET must be set".to_string()),
        };

        let jwt_ttl_secs = match std::env::var("JWT_TTL_SECS") {
            Ok(raw) if !raw.trim().is_empty() => {
                let ttl: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("JWT_TTL_SECS is not a number: {raw}"))?;
                if ttl <= 0 {
                    return Err("JWT_TTL_SECS must be positive".to_string());
                }
                Some(ttl)
            }
            _ => None,
        };

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            Err(_) => "*".to_string(),
        };

        let post_limit: i64 = parse_env_or_default("POST_LIMIT", 10)?;
        if post_limit <= 0 {
            return Err("POST_LIMIT must be positive".to_string());
        }

        let default_community = std::env::var("DEFAULT_COMMUNITY_ID")
            .unwrap_or_else(|_| DEFAULT_COMMUNITY_ID.to_string());
        let default_community = ObjectId::parse_str(default_community.trim())
            .map_err(|e| format!("DEFAULT_COMMUNITY_ID is not an ObjectId: {e}"))?;

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("PORT", 8080)?,
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DB_CONN_STR")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                name: std::env::var("DATABASE_NAME").unwrap_or_else(|_| "justhink".to_string()),
                timeout_secs: parse_env_or_default("DB_TIMEOUT_SECS", 10)?,
                aggregate_timeout_ms: parse_env_or_default("DB_AGGREGATE_TIMEOUT_MS", 2_000)?,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_ttl_secs,
            },
            storage: S3Config::from_env(),
            push: PushConfig {
                enabled: parse_env_or_default("PUSH_ENABLED", true)?,
                credentials_file: std::env::var("FIREBASE_CREDENTIALS_FILE")
                    .unwrap_or_else(|_| "./firebase-service-account-key.json".to_string()),
            },
            feed: FeedConfig {
                post_limit,
                default_community,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{key} has an invalid value: {raw}")),
        _ => Ok(default),
    }
}
