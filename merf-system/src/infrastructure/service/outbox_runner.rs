use std::{sync::Arc, time::Duration};

use domain_request::{model::vo::MailMessage, service::MailTransport};
use tracing::{error, info, warn};
use typed_builder::TypedBuilder;

/// Drains the notification outbox, retrying each message a bounded number of times.
///
/// A failed message waits out the retry interval off to the side, so later
/// messages are not held up behind it. Queued mail lives only in memory.
#[derive(TypedBuilder)]
pub struct OutboxRunner {
    receiver: flume::Receiver<MailMessage>,
    mail_transport: Arc<dyn MailTransport>,
    #[builder(default = 3)]
    max_attempts: u32,
    #[builder(default = Duration::from_secs(30))]
    retry_interval: Duration,
}

impl OutboxRunner {
    /// Runs until every sender of the outbox is dropped and no retry is pending.
    pub async fn run(&self) {
        let (retry_sender, retry_receiver) = flume::unbounded::<(MailMessage, u32)>();
        let mut outbox_open = true;
        let mut waiting = 0usize;
        while outbox_open || waiting > 0 {
            let (message, attempt) = tokio::select! {
                received = self.receiver.recv_async(), if outbox_open => match received {
                    Ok(message) => (message, 1),
                    Err(_) => {
                        info!("Notification outbox closed.");
                        outbox_open = false;
                        continue;
                    }
                },
                Ok(retry) = retry_receiver.recv_async(), if waiting > 0 => {
                    waiting -= 1;
                    retry
                }
                else => break,
            };
            if self.attempt(&message, attempt).await || attempt >= self.max_attempts {
                continue;
            }
            waiting += 1;
            let retry_sender = retry_sender.clone();
            let retry_interval = self.retry_interval;
            tokio::spawn(async move {
                tokio::time::sleep(retry_interval).await;
                let _ = retry_sender.send((message, attempt + 1));
            });
        }
    }

    async fn attempt(&self, message: &MailMessage, attempt: u32) -> bool {
        match self.mail_transport.send(message).await {
            Ok(()) => {
                info!(subject = %message.subject, attempt, "Notification delivered.");
                true
            }
            Err(e) if attempt >= self.max_attempts => {
                error!(
                    subject = %message.subject,
                    attempts = self.max_attempts,
                    "Notification dropped after retries: {e}"
                );
                false
            }
            Err(e) => {
                warn!(subject = %message.subject, attempt, "Notification attempt failed: {e}");
                false
            }
        }
    }
}
