//! Shared fixtures for the HTTP integration tests
//!
//! Each test gets a fresh database on a single MongoDB container, a recording
//! push sender and an in-memory object store.

#![allow(dead_code)]

use async_trait::async_trait;
use bson::oid::ObjectId;
use justhink_api::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, FeedConfig, PushConfig,
};
use justhink_api::db::Database;
use justhink_api::services::{ObjectStore, PushSender, Signup};
use justhink_api::{AppState, Config};
use s3_utils::S3Config;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use testcontainers::{clients::Cli, core::WaitFor, GenericImage};
use tokio::sync::Mutex;

pub const PAGE_SIZE: i64 = 3;

static MONGO_URL: OnceLock<String> = OnceLock::new();

/// Start MongoDB once per test binary and return its connection string
pub fn mongo_url() -> String {
    MONGO_URL
        .get_or_init(|| {
            let docker: &'static Cli = Box::leak(Box::new(Cli::default()));
            let image = GenericImage::new("mongo", "7")
                .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
                .with_exposed_port(27017);

            let container = docker.run(image);
            let port = container.get_host_port_ipv4(27017);

            // Keep the container alive for the whole test binary
            Box::leak(Box::new(container));

            format!("mongodb://127.0.0.1:{port}")
        })
        .clone()
}

#[derive(Debug, Clone)]
pub struct SentPush {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

#[derive(Default)]
pub struct RecordingPushSender {
    pub sent: Mutex<Vec<SentPush>>,
}

#[async_trait]
impl PushSender for RecordingPushSender {
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> justhink_api::Result<String> {
        let mut sent = self.sent.lock().await;
        sent.push(SentPush {
            token: token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data,
        });
        Ok(format!("projects/test/messages/{}", sent.len()))
    }
}

#[derive(Default)]
pub struct MemoryStore;

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_public(
        &self,
        key: &str,
        _body: Vec<u8>,
        _content_type: &str,
    ) -> justhink_api::Result<String> {
        Ok(format!("https://cdn.test/{key}"))
    }
}

pub struct TestContext {
    pub state: AppState,
    pub push: Arc<RecordingPushSender>,
    pub community: ObjectId,
}

pub fn test_config(url: String) -> Config {
    Config {
        app: AppConfig {
            env: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        cors: CorsConfig {
            allowed_origins: "*".to_string(),
        },
        database: DatabaseConfig {
            url,
            name: format!("justhink_test_{}", ObjectId::new().to_hex()),
            timeout_secs: 10,
            aggregate_timeout_ms: 2_000,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            jwt_ttl_secs: None,
        },
        storage: S3Config {
            bucket: "justhink-test".to_string(),
            region: "eu-central-1".to_string(),
            endpoint_url: None,
            base_url: None,
            path_style: false,
        },
        push: PushConfig {
            enabled: false,
            credentials_file: String::new(),
        },
        feed: FeedConfig {
            post_limit: PAGE_SIZE,
            default_community: ObjectId::new(),
        },
    }
}

impl TestContext {
    pub async fn new() -> Self {
        let config = test_config(mongo_url());
        let db = Database::connect(&config.database)
            .await
            .expect("connect to MongoDB");
        db.ensure_indexes().await.expect("create indexes");

        let push = Arc::new(RecordingPushSender::default());
        let state = AppState::new(db, &config, push.clone(), Arc::new(MemoryStore));

        Self {
            state,
            push,
            community: config.feed.default_community,
        }
    }

    /// Register a user and return its id with a bearer token
    pub async fn user(&self, username: &str) -> (ObjectId, String) {
        let id = self
            .state
            .users
            .signup(Signup {
                username: username.to_string(),
                fullname: format!("{username} Tester"),
                email: format!("{username}@example.com"),
                password: "correct horse battery staple".to_string(),
                language: Some("en".to_string()),
            })
            .await
            .expect("signup");
        let token = self.state.jwt.generate(&id.to_hex()).expect("token");
        (id, token)
    }

    pub fn collection(&self, name: &str) -> mongodb::Collection<bson::Document> {
        self.state.db.collection(name)
    }
}

/// Build the full app over a context's state
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {{
        let keys = $ctx.state.jwt.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .configure(move |cfg| justhink_api::routes::configure_routes(cfg, keys)),
        )
        .await
    }};
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
