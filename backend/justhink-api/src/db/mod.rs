/// Database access layer
///
/// This module provides:
/// - The MongoDB handle with per-operation timeouts
/// - A typed aggregation pipeline builder
/// - Repositories for users, posts, comments and communities
pub mod comment_repo;
pub mod community_repo;
pub mod pipeline;
pub mod post_repo;
pub mod user_repo;

pub use comment_repo::CommentRepository;
pub use community_repo::CommunityRepository;
pub use pipeline::{expr, Page, Pipeline};
pub use post_repo::PostRepository;
pub use user_repo::UserRepository;

use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::options::{AggregateOptions, ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};

pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";
pub const COMMUNITIES: &str = "communities";

/// Shared MongoDB handle
#[derive(Clone, Debug)]
pub struct Database {
    inner: mongodb::Database,
    aggregate_timeout: Duration,
}

impl Database {
    /// Connect and verify the deployment answers a ping
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = Some("justhink-api".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        let db = Self::new(
            client.database(&config.name),
            Duration::from_millis(config.aggregate_timeout_ms),
        );
        db.ping().await?;

        Ok(db)
    }

    pub fn new(inner: mongodb::Database, aggregate_timeout: Duration) -> Self {
        Self {
            inner,
            aggregate_timeout,
        }
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T> {
        self.inner.collection(name)
    }

    pub async fn ping(&self) -> Result<()> {
        self.inner.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Run `pipeline` against `collection` and decode every output document
    pub async fn aggregate<T: DeserializeOwned>(
        &self,
        collection: &str,
        pipeline: Pipeline,
    ) -> Result<Vec<T>> {
        let options = AggregateOptions::builder()
            .max_time(self.aggregate_timeout)
            .build();

        let docs: Vec<Document> = self
            .collection::<Document>(collection)
            .aggregate(pipeline.into_stages(), options)
            .await?
            .try_collect()
            .await?;

        docs.into_iter()
            .map(|doc| bson::from_document(doc).map_err(AppError::from))
            .collect()
    }

    /// First output document of `pipeline`, if any
    pub async fn aggregate_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        pipeline: Pipeline,
    ) -> Result<Option<T>> {
        let mut rows = self.aggregate(collection, pipeline.limit(1)).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Indexes backing the lookups the handlers run on every request
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique = IndexOptions::builder().unique(true).build();

        self.collection::<Document>(USERS)
            .create_indexes(
                vec![
                    IndexModel::builder()
                        .keys(doc! { "username": 1 })
                        .options(unique.clone())
                        .build(),
                    IndexModel::builder()
                        .keys(doc! { "email": 1 })
                        .options(unique)
                        .build(),
                ],
                None,
            )
            .await?;

        self.collection::<Document>(POSTS)
            .create_indexes(
                vec![
                    IndexModel::builder()
                        .keys(doc! { "community": 1, "date": -1 })
                        .build(),
                    IndexModel::builder().keys(doc! { "tags": 1 }).build(),
                ],
                None,
            )
            .await?;

        self.collection::<Document>(COMMENTS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "post": 1, "date": 1 })
                    .build(),
                None,
            )
            .await?;

        tracing::info!("database indexes ensured");
        Ok(())
    }
}

/// Viewer's upvote flag and the resource author, read before toggling
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteState {
    pub upvoted: bool,
    pub author: ObjectId,
}
