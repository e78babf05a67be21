/// Shared application state handed to every handler
use crypto_core::JwtKeys;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{CommentRepository, CommunityRepository, Database, PostRepository, UserRepository};
use crate::services::{
    AuthService, CommentService, CommunityService, MongoSearchBackend, NotificationService,
    ObjectStore, PostService, PushSender, SearchService, UploadService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtKeys>,
    pub auth: AuthService,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub communities: CommunityService,
    pub notifications: NotificationService,
    pub search: SearchService,
    pub upload: UploadService,
}

impl AppState {
    /// Wire repositories and services over `db` with the given push and storage backends
    pub fn new(
        db: Database,
        config: &Config,
        push: Arc<dyn PushSender>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let ttl = config.auth.jwt_ttl_secs.map(chrono::Duration::seconds);
        let jwt = Arc::new(JwtKeys::new(&config.auth.jwt_secret, ttl));

        let user_repo = UserRepository::new(db.clone());
        let post_repo = PostRepository::new(db.clone());
        let comment_repo = CommentRepository::new(db.clone());
        let community_repo = CommunityRepository::new(db.clone());

        let notifications = NotificationService::new(user_repo.clone(), push);

        Self {
            auth: AuthService::new(user_repo.clone(), jwt.clone()),
            users: UserService::new(user_repo.clone(), notifications.clone()),
            posts: PostService::new(
                post_repo.clone(),
                user_repo.clone(),
                notifications.clone(),
                config.feed.clone(),
            ),
            comments: CommentService::new(
                comment_repo,
                post_repo.clone(),
                user_repo.clone(),
                notifications.clone(),
                config.feed.clone(),
            ),
            communities: CommunityService::new(community_repo.clone(), user_repo.clone()),
            search: SearchService::new(Arc::new(MongoSearchBackend::new(
                user_repo,
                post_repo,
                community_repo,
            ))),
            upload: UploadService::new(store),
            notifications,
            jwt,
            db,
        }
    }
}
