use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use domain_request::{
    exception::{RequestException, RequestResult},
    model::{entity::RequestRecord, vo::AdminSession},
    repository::RequestRecordRepo,
    service::{AccessGateService, ExportService},
};
use serde::Serialize;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct CsvExportServiceImpl {
    record_repository: Arc<dyn RequestRecordRepo>,
    access_gate_service: Arc<dyn AccessGateService>,
}

/// One spreadsheet row, headed like the request form.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Reference No")]
    reference_no: String,
    #[serde(rename = "Program Owner")]
    program_owner: &'a str,
    #[serde(rename = "Training Title")]
    training_title: &'a str,
    #[serde(rename = "Venue")]
    venue: &'a str,
    #[serde(rename = "Date Start")]
    date_start: String,
    #[serde(rename = "Date End")]
    date_end: String,
    #[serde(rename = "Memorandum File")]
    memorandum_file: &'a str,
    #[serde(rename = "Activity Matrix File")]
    activity_matrix_file: &'a str,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Admin Remarks")]
    admin_remarks: &'a str,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

impl<'a> From<&'a RequestRecord> for ExportRow<'a> {
    fn from(record: &'a RequestRecord) -> Self {
        Self {
            reference_no: record
                .reference_no
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            program_owner: &record.program_owner,
            training_title: &record.training_title,
            venue: &record.venue,
            date_start: record.date_start.to_string(),
            date_end: record.date_end.to_string(),
            memorandum_file: &record.memorandum_file,
            activity_matrix_file: &record.activity_matrix_file,
            status: record.status.to_string(),
            admin_remarks: &record.admin_remarks,
            timestamp: record.timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        }
    }
}

fn render(records: &[RequestRecord]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    if records.is_empty() {
        writer.write_record(HEADERS)?;
    }
    writer.into_inner().map_err(|e| anyhow!("Cannot flush csv export: {}", e.error()))
}

const HEADERS: [&str; 11] = [
    "Reference No",
    "Program Owner",
    "Training Title",
    "Venue",
    "Date Start",
    "Date End",
    "Memorandum File",
    "Activity Matrix File",
    "Status",
    "Admin Remarks",
    "Timestamp",
];

#[async_trait]
impl ExportService for CsvExportServiceImpl {
    async fn export_csv(&self, session: &AdminSession) -> RequestResult<Vec<u8>> {
        self.access_gate_service.authorize(session.id).await?;
        let records = self
            .record_repository
            .get_all()
            .await
            .map_err(|source| RequestException::Storage { source })?;
        Ok(render(&records)?)
    }
}
