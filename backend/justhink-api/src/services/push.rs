/// Push delivery seam
///
/// `main` picks the implementation: FCM when push is enabled, otherwise a
/// sender that only logs. Tests inject a recording sender.
use async_trait::async_trait;
use fcm_shared::FCMClient;
use std::collections::HashMap;

use crate::error::Result;

#[async_trait]
pub trait PushSender: Send + Sync {
    /// Deliver one message and return the provider's message id
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> Result<String>;

    /// Release provider resources; called once after the server stops
    async fn shutdown(&self) {}
}

#[async_trait]
impl PushSender for FCMClient {
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> Result<String> {
        let result = FCMClient::send(self, token, title, body, data).await?;
        Ok(result.message_id)
    }

    async fn shutdown(&self) {
        FCMClient::shutdown(self).await
    }
}

/// Used when `PUSH_ENABLED=false`
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPushSender;

#[async_trait]
impl PushSender for NoopPushSender {
    async fn send(
        &self,
        _token: &str,
        title: &str,
        _body: &str,
        _data: HashMap<String, String>,
    ) -> Result<String> {
        tracing::debug!(title = %title, "push disabled; message not delivered");
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_noop_sender_accepts_everything() {
        let sender: Arc<dyn PushSender> = Arc::new(NoopPushSender);
        let id = sender
            .send("token", "title", "body", HashMap::new())
            .await
            .unwrap();

        assert!(id.is_empty());
        sender.shutdown().await;
    }
}
