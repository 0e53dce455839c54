use indoc::formatdoc;
use serde::{Deserialize, Serialize};

use crate::model::entity::RequestRecord;

/// A plain text mail ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Notice sent to the administrators when a request is created.
    pub fn submission_notice(record: &RequestRecord, recipients: &[String]) -> Self {
        let reference = record.display_reference();
        let body = formatdoc! {"
            New MERF request submitted.

            Reference No: {reference}
            Program Owner: {owner}
            Training Title: {title}
            Venue: {venue}
            Dates: {start} to {end}
            ",
            reference = reference,
            owner = record.program_owner,
            title = record.training_title,
            venue = record.venue,
            start = record.date_start,
            end = record.date_end,
        };
        Self {
            recipients: recipients.to_vec(),
            subject: format!("NEW MERF REQUEST – {reference}"),
            body,
        }
    }
}

/// What happened to the notification of a persisted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum NotificationOutcome {
    /// Delivered to the mail relay.
    Sent,
    /// Handed to the outbox, delivered in the background.
    Queued,
    /// No recipients configured.
    Skipped,
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
