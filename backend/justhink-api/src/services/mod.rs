/// Business logic layer
///
/// This module provides:
/// - Auth: credential check and token issuance
/// - Users, posts, comments, communities: validation, toggles and ownership
/// - Notifications: push dispatch and persistence
/// - Search: concurrent fan-out over the three collections
/// - Upload: image processing and object storage
pub mod auth;
pub mod comments;
pub mod communities;
pub mod notification;
pub mod posts;
pub mod push;
pub mod search;
pub mod upload;
pub mod users;

pub use auth::{AuthService, LoginResponse};
pub use comments::{CommentService, NewComment};
pub use communities::{CommunityService, MembershipAction, NewCommunity};
pub use notification::NotificationService;
pub use posts::{NewPost, PostService};
pub use push::{NoopPushSender, PushSender};
pub use search::{MongoSearchBackend, SearchBackend, SearchService};
pub use upload::{ObjectStore, UploadService};
pub use users::{FollowAction, LookupField, Signup, UserPatch, UserService};

use crate::error::{AppError, Result};

/// Upvote toggle shared by posts and comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Upvote,
    Downvote,
}

impl VoteAction {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "upvote" => Ok(VoteAction::Upvote),
            "downvote" => Ok(VoteAction::Downvote),
            _ => Err(AppError::NotFound("Not Found".to_string())),
        }
    }
}
