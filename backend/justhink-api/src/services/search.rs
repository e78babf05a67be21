/// Search across users, posts and communities
///
/// The three queries run concurrently; the response waits for all of them.
use async_trait::async_trait;
use bson::Regex;
use std::sync::Arc;

use crate::db::{CommunityRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{CommunityHit, PostHit, SearchResponse, UserHit};

/// Case-insensitive pattern matching `query` literally
pub fn literal_pattern(query: &str) -> Regex {
    Regex {
        pattern: regex::escape(query),
        options: "i".to_string(),
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn users(&self, pattern: &Regex) -> Result<Vec<UserHit>>;
    async fn posts(&self, pattern: &Regex, tag: &str) -> Result<Vec<PostHit>>;
    async fn communities(&self, pattern: &Regex) -> Result<Vec<CommunityHit>>;
}

pub struct MongoSearchBackend {
    users: UserRepository,
    posts: PostRepository,
    communities: CommunityRepository,
}

impl MongoSearchBackend {
    pub fn new(
        users: UserRepository,
        posts: PostRepository,
        communities: CommunityRepository,
    ) -> Self {
        Self {
            users,
            posts,
            communities,
        }
    }
}

#[async_trait]
impl SearchBackend for MongoSearchBackend {
    async fn users(&self, pattern: &Regex) -> Result<Vec<UserHit>> {
        self.users.search(pattern).await
    }

    async fn posts(&self, pattern: &Regex, tag: &str) -> Result<Vec<PostHit>> {
        self.posts.search(pattern, tag).await
    }

    async fn communities(&self, pattern: &Regex) -> Result<Vec<CommunityHit>> {
        self.communities.search(pattern).await
    }
}

#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
}

impl SearchService {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Query is not given".to_string()));
        }

        let pattern = literal_pattern(query);
        let (users, posts, communities) = tokio::join!(
            self.backend.users(&pattern),
            self.backend.posts(&pattern, query),
            self.backend.communities(&pattern),
        );

        let response = SearchResponse::new(users?, posts?, communities?);
        tracing::debug!(query = %query, hits = response.length, "search finished");
        Ok(response)
    }
}
