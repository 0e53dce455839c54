use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::vo::{DocumentUpload, ReferenceNo, ReviewDecision};

/// Filled request form as received from a program owner.
#[derive(Debug, Clone)]
pub struct SubmitRequestCommand {
    pub program_owner: String,
    pub training_title: String,
    pub venue: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub memorandum: Option<DocumentUpload>,
    pub activity_matrix: Option<DocumentUpload>,
}

/// Administrator decision on one pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCommand {
    pub reference_no: ReferenceNo,
    pub decision: ReviewDecision,
    #[serde(default)]
    pub remarks: String,
}
