use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ReferenceNo, RequestStatus};
use crate::model::entity::RequestRecord;

/// One line of the append-only record log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RecordEvent {
    Created { record: RequestRecord },
    Reviewed(ReviewEntry),
}

/// Review outcome applied to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub reference_no: ReferenceNo,
    pub status: RequestStatus,
    pub admin_remarks: String,
    pub reviewed_at: NaiveDateTime,
}
