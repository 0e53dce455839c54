use serde::Serialize;

use super::NotificationOutcome;
use crate::model::entity::RequestRecord;

/// Result of a submission whose record was persisted.
///
/// A record that could not be persisted is reported as an error instead, so
/// holding one of these always means the request exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub record: RequestRecord,
    pub notification: NotificationOutcome,
}

impl SubmissionOutcome {
    pub fn message(&self) -> String {
        match &self.record.reference_no {
            Some(reference_no) => {
                format!("Request submitted successfully. Reference No: {reference_no}")
            }
            None => "Request submitted successfully.".to_string(),
        }
    }
}
