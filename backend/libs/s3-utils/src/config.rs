/// S3 configuration for the upload service
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Custom endpoint (MinIO, localstack); public URLs are built from it too
    pub endpoint_url: Option<String>,
    /// Public base URL (CDN domain) that overrides the bucket URL
    pub base_url: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Self {
            bucket: non_empty("AWS_BUCKET").unwrap_or_else(|| "justhink".to_string()),
            region: non_empty("AWS_REGION").unwrap_or_else(|| "eu-central-1".to_string()),
            endpoint_url: non_empty("S3_ENDPOINT"),
            base_url: non_empty("S3_BASE_URL"),
            path_style: std::env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Public URL of an object
    pub fn object_url(&self, key: &str) -> String {
        if let Some(base) = &self.base_url {
            return format!("{}/{}", base.trim_end_matches('/'), key);
        }

        match (&self.endpoint_url, self.path_style) {
            (Some(endpoint), _) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            (None, true) => format!(
                "https://s3.{}.amazonaws.com/{}/{}",
                self.region, self.bucket, key
            ),
            (None, false) => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3Config {
        S3Config {
            bucket: "justhink".to_string(),
            region: "eu-central-1".to_string(),
            endpoint_url: None,
            base_url: None,
            path_style: false,
        }
    }

    #[test]
    fn test_object_url_virtual_hosted_style() {
        assert_eq!(
            config().object_url("avatar.jpeg"),
            "https://justhink.s3.eu-central-1.amazonaws.com/avatar.jpeg"
        );
    }

    #[test]
    fn test_object_url_path_style() {
        let config = S3Config {
            path_style: true,
            ..config()
        };
        assert_eq!(
            config.object_url("avatar.jpeg"),
            "https://s3.eu-central-1.amazonaws.com/justhink/avatar.jpeg"
        );
    }

    #[test]
    fn test_object_url_custom_endpoint() {
        let config = S3Config {
            endpoint_url: Some("http://localhost:9000/".to_string()),
            ..config()
        };
        assert_eq!(
            config.object_url("a.jpeg"),
            "http://localhost:9000/justhink/a.jpeg"
        );
    }

    #[test]
    fn test_base_url_wins() {
        let config = S3Config {
            base_url: Some("https://cdn.justhink.net".to_string()),
            endpoint_url: Some("http://localhost:9000".to_string()),
            ..config()
        };
        assert_eq!(config.object_url("a.jpeg"), "https://cdn.justhink.net/a.jpeg");
    }
}
