/// Notification delivery and persistence
use bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;

use super::push::PushSender;
use crate::db::user_repo::Recipient;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::i18n::{Language, Template};
use crate::models::{Notification, NotificationPayload, NotificationView};

/// Keys every pushed message carries so the mobile client opens the app
pub fn base_data() -> HashMap<String, String> {
    HashMap::from([
        (
            "click_action".to_string(),
            "FLUTTER_NOTIFICATION_CLICK".to_string(),
        ),
        ("sound".to_string(), "default".to_string()),
    ])
}

#[derive(Clone)]
pub struct NotificationService {
    users: UserRepository,
    push: Arc<dyn PushSender>,
}

impl NotificationService {
    pub fn new(users: UserRepository, push: Arc<dyn PushSender>) -> Self {
        Self { users, push }
    }

    /// Push `payload` to `target` if it has a device token, then persist it.
    ///
    /// Returns the provider message id, or `"OK"` when nothing was pushed.
    /// A failed push is returned as an error and nothing is persisted.
    pub async fn send(&self, target: ObjectId, payload: NotificationPayload) -> Result<String> {
        let recipient = self.recipient(target).await?;
        self.deliver(target, &recipient, payload).await
    }

    pub async fn send_to_username(
        &self,
        username: &str,
        payload: NotificationPayload,
    ) -> Result<String> {
        let target = self
            .users
            .id_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))?;
        self.send(target, payload).await
    }

    async fn recipient(&self, target: ObjectId) -> Result<Recipient> {
        self.users
            .recipient(target)
            .await?
            .ok_or_else(|| AppError::NotFound("User Not Found".to_string()))
    }

    async fn deliver(
        &self,
        target: ObjectId,
        recipient: &Recipient,
        payload: NotificationPayload,
    ) -> Result<String> {
        let mut message_id = "OK".to_string();
        if let Some(token) = recipient.fcm_token.as_deref().filter(|t| !t.is_empty()) {
            let mut data = base_data();
            data.extend(payload.data.clone());

            let id = self
                .push
                .send(token, &payload.title, &payload.body, data)
                .await?;
            if !id.is_empty() {
                message_id = id;
            }
        }

        self.users
            .push_notification(target, &Notification::from_payload(&payload))
            .await?;

        tracing::debug!(user = %target, title = %payload.title, "notification stored");
        Ok(message_id)
    }

    /// Render `template` in the target's language and send it
    pub async fn notify(
        &self,
        target: ObjectId,
        template: Template,
        actor: &str,
        data: HashMap<String, String>,
    ) -> Result<String> {
        let recipient = self.recipient(target).await?;
        let (title, body) = template.render(Language::from_code(&recipient.language), actor);

        self.deliver(target, &recipient, NotificationPayload { title, body, data })
            .await
    }

    /// Fire-and-log variant for handlers whose own mutation already succeeded
    pub async fn notify_logged(
        &self,
        target: ObjectId,
        template: Template,
        actor: &str,
        data: HashMap<String, String>,
    ) {
        if let Err(e) = self.notify(target, template, actor, data).await {
            tracing::warn!(user = %target, error = %e, "notification dispatch failed");
        }
    }

    pub async fn list(&self, user: ObjectId) -> Result<Vec<NotificationView>> {
        self.users.notifications(user).await
    }

    pub async fn shutdown(&self) {
        self.push.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_data_overrides_base_keys() {
        let mut data = base_data();
        data.extend(HashMap::from([
            ("sound".to_string(), "none".to_string()),
            ("post".to_string(), "abc".to_string()),
        ]));

        assert_eq!(data["click_action"], "FLUTTER_NOTIFICATION_CLICK");
        assert_eq!(data["sound"], "none");
        assert_eq!(data["post"], "abc");
    }
}
