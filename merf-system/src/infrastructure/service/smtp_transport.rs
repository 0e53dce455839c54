use async_trait::async_trait;
use domain_request::{model::vo::MailMessage, service::MailTransport};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::infrastructure::config::MailConfig;

/// Implicit TLS, authenticated SMTP relay with a single sender identity.
pub struct SmtpMailTransport {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let sender = config.sender.parse::<Mailbox>()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.sender.to_owned(),
                config.password.to_owned(),
            ))
            .build();
        Ok(Self { sender, transport })
    }
}

fn build_message(sender: &Mailbox, message: &MailMessage) -> anyhow::Result<Message> {
    let mut builder = Message::builder()
        .from(sender.to_owned())
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN);
    for recipient in message.recipients.iter() {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }
    Ok(builder.body(message.body.to_owned())?)
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<()> {
        let email = build_message(&self.sender, message)?;
        self.transport.send(email).await?;
        Ok(())
    }
}
