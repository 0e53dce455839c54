use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use domain_request::{
    model::{
        entity::RequestRecord,
        vo::{MailMessage, NotificationOutcome},
    },
    service::{MailTransport, NotifyService},
};
use tracing::debug;
use typed_builder::TypedBuilder;

/// Sends the notice inline; a transport failure is returned to the caller.
#[derive(TypedBuilder)]
pub struct MailNotifyServiceImpl {
    mail_transport: Arc<dyn MailTransport>,
    #[builder(default)]
    recipients: Vec<String>,
}

#[async_trait]
impl NotifyService for MailNotifyServiceImpl {
    async fn notify_submitted(
        &self,
        record: &RequestRecord,
    ) -> anyhow::Result<NotificationOutcome> {
        if self.recipients.is_empty() {
            return Ok(NotificationOutcome::Skipped);
        }
        let message = MailMessage::submission_notice(record, &self.recipients);
        self.mail_transport.send(&message).await?;
        debug!(subject = %message.subject, "Submission notice sent.");
        Ok(NotificationOutcome::Sent)
    }
}

/// Queues the notice for the background outbox runner.
#[derive(TypedBuilder)]
pub struct OutboxNotifyServiceImpl {
    outbox: flume::Sender<MailMessage>,
    #[builder(default)]
    recipients: Vec<String>,
}

#[async_trait]
impl NotifyService for OutboxNotifyServiceImpl {
    async fn notify_submitted(
        &self,
        record: &RequestRecord,
    ) -> anyhow::Result<NotificationOutcome> {
        if self.recipients.is_empty() {
            return Ok(NotificationOutcome::Skipped);
        }
        let message = MailMessage::submission_notice(record, &self.recipients);
        self.outbox
            .send_async(message)
            .await
            .map_err(|_| anyhow!("Notification outbox is closed."))?;
        Ok(NotificationOutcome::Queued)
    }
}
