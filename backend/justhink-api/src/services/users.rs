/// User accounts, profiles and the follow graph
use bson::{oid::ObjectId, Document};
use crypto_core::hash_password;
use serde::Deserialize;
use std::collections::HashMap;

use super::NotificationService;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::i18n::Template;
use crate::models::{User, UserProfile};

/// Registration body
#[derive(Debug, Deserialize)]
pub struct Signup {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub language: Option<String>,
}

impl Signup {
    fn validate(&self) -> Result<()> {
        let missing = [
            ("username", &self.username),
            ("fullname", &self.fullname),
            ("email", &self.email),
            ("password", &self.password),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match missing {
            Some((field, _)) => Err(AppError::Validation(format!("{field} is not given"))),
            None => Ok(()),
        }
    }
}

/// Partial profile update; absent or blank fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub language: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    /// `$set` body for the patch, with the password re-hashed
    pub fn to_update(&self) -> Result<Document> {
        let mut fields = Document::new();
        let plain = [
            ("username", &self.username),
            ("fullname", &self.fullname),
            ("email", &self.email),
            ("bio", &self.bio),
            ("image", &self.image),
            ("language", &self.language),
        ];
        for (name, value) in plain {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                fields.insert(name, value);
            }
        }

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            fields.insert("password", hash_password(password)?);
        }

        Ok(fields)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    Username,
    Email,
}

impl LookupField {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "username" => Ok(LookupField::Username),
            "email" => Ok(LookupField::Email),
            _ => Err(AppError::BadRequest("Unknown Parameter Type".to_string())),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LookupField::Username => "username",
            LookupField::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAction {
    Follow,
    Unfollow,
}

impl FollowAction {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "follow" => Ok(FollowAction::Follow),
            "unfollow" => Ok(FollowAction::Unfollow),
            _ => Err(AppError::NotFound("Not Found".to_string())),
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    notifications: NotificationService,
}

impl UserService {
    pub fn new(users: UserRepository, notifications: NotificationService) -> Self {
        Self {
            users,
            notifications,
        }
    }

    pub async fn profile(&self, id: ObjectId, viewer: ObjectId) -> Result<UserProfile> {
        self.users
            .profile(id, viewer)
            .await?
            .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))
    }

    pub async fn exists(&self, field: LookupField, value: &str) -> Result<bool> {
        self.users.exists_by(field.as_str(), value).await
    }

    pub async fn signup(&self, signup: Signup) -> Result<ObjectId> {
        signup.validate()?;

        if self.users.exists_by("username", &signup.username).await? {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.users.exists_by("email", &signup.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let hash = hash_password(&signup.password)?;
        let user = User::new(
            signup.username,
            signup.fullname,
            signup.email,
            hash,
            signup.language,
        );
        let id = self.users.insert(&user).await?;

        tracing::info!(user = %id, username = %user.username, "user registered");
        Ok(id)
    }

    pub async fn edit(&self, id: ObjectId, patch: &UserPatch) -> Result<()> {
        let fields = patch.to_update()?;
        if fields.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }

        for unique in ["username", "email"] {
            if let Ok(value) = fields.get_str(unique) {
                if let Some(owner) = self.users.id_by_field(unique, value).await? {
                    if owner != id {
                        return Err(AppError::Conflict(format!("{unique} already in use")));
                    }
                }
            }
        }

        if !self.users.set_fields(id, fields).await? {
            return Err(AppError::NotFound("User Not Found".to_string()));
        }
        Ok(())
    }

    pub async fn update_fcm_token(&self, id: ObjectId, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            return Err(AppError::Validation("Token not provided".to_string()));
        }
        if !self.users.set_fcm_token(id, token).await? {
            return Err(AppError::NotFound("User Not Found".to_string()));
        }
        Ok(())
    }

    /// Follow or unfollow `target`; following yourself changes nothing
    pub async fn follow_action(
        &self,
        action: FollowAction,
        caller: ObjectId,
        target: ObjectId,
    ) -> Result<()> {
        if caller == target {
            return Ok(());
        }

        let followed = self
            .users
            .follow_state(caller, target)
            .await?
            .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))?;

        match action {
            FollowAction::Follow => {
                if followed {
                    return Err(AppError::Conflict("User already followed".to_string()));
                }
                self.users.add_follow(caller, target).await?;

                if let Some(actor) = self.users.find_by_id(caller).await? {
                    let data = HashMap::from([("user".to_string(), caller.to_hex())]);
                    self.notifications
                        .notify_logged(target, Template::FOLLOW, &actor.display_name(), data)
                        .await;
                }
            }
            FollowAction::Unfollow => {
                if !followed {
                    return Err(AppError::Conflict("User already unfollowed".to_string()));
                }
                self.users.remove_follow(caller, target).await?;
            }
        }

        tracing::debug!(caller = %caller, followee = %target, ?action, "follow graph updated");
        Ok(())
    }
}
