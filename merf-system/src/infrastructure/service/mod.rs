mod outbox_runner;
mod smtp_transport;

pub mod prelude {
    pub use super::outbox_runner::OutboxRunner;
    pub use super::smtp_transport::SmtpMailTransport;
}
