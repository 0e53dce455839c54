use async_trait::async_trait;

use crate::model::{
    entity::RequestRecord,
    vo::{MailMessage, NotificationOutcome},
};

#[async_trait]
pub trait NotifyService: Send + Sync {
    async fn notify_submitted(&self, record: &RequestRecord)
        -> anyhow::Result<NotificationOutcome>;
}

/// Outbound mail relay.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<()>;
}
