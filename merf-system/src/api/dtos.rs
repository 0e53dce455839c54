use actix_easy_multipart::{tempfile::Tempfile, text::Text, MultipartForm};
use chrono::{DateTime, NaiveDate, Utc};
use domain_request::{
    command::SubmitRequestCommand,
    model::vo::{AdminSession, DocumentUpload, NotificationOutcome, SubmissionOutcome},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(MultipartForm)]
pub struct SubmitRequestForm {
    pub program_owner: Text<String>,
    pub training_title: Text<String>,
    pub venue: Text<String>,
    pub date_start: Text<NaiveDate>,
    pub date_end: Text<NaiveDate>,
    pub memorandum: Option<Tempfile>,
    pub activity_matrix: Option<Tempfile>,
}

impl SubmitRequestForm {
    pub async fn into_command(self) -> anyhow::Result<SubmitRequestCommand> {
        Ok(SubmitRequestCommand {
            program_owner: self.program_owner.0,
            training_title: self.training_title.0,
            venue: self.venue.0,
            date_start: self.date_start.0,
            date_end: self.date_end.0,
            memorandum: read_upload(self.memorandum).await?,
            activity_matrix: read_upload(self.activity_matrix).await?,
        })
    }
}

/// Browsers send an unnamed empty part for an unselected file input.
async fn read_upload(file: Option<Tempfile>) -> anyhow::Result<Option<DocumentUpload>> {
    let file = match file {
        Some(el) => el,
        None => return Ok(None),
    };
    let file_name = file.file_name.clone().unwrap_or_default();
    if file_name.is_empty() && file.size == 0 {
        return Ok(None);
    }
    let content = tokio::fs::read(file.file.path()).await?;
    Ok(Some(DocumentUpload::new(file_name, content)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub reference_no: Option<String>,
    pub notification: NotificationOutcome,
}

impl From<SubmissionOutcome> for SubmitResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            message: outcome.message(),
            reference_no: outcome.record.reference_no.as_ref().map(ToString::to_string),
            notification: outcome.notification,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl From<AdminSession> for LoginResponse {
    fn from(session: AdminSession) -> Self {
        Self {
            session_id: session.id,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct ReviewRequest {
    #[serde(default)]
    pub remarks: String,
}
