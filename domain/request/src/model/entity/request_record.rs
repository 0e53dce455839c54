use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    exception::{RequestException, RequestResult},
    model::vo::{ReferenceNo, RequestStatus, ReviewDecision, ReviewEntry, StoredDocuments},
};

/// One submitted training request and its review outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// Absent when reference issuance is turned off.
    pub reference_no: Option<ReferenceNo>,
    pub program_owner: String,
    pub training_title: String,
    pub venue: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Stored name under the memorandum directory.
    pub memorandum_file: String,
    /// Stored name under the activity matrix directory.
    pub activity_matrix_file: String,
    pub status: RequestStatus,
    pub admin_remarks: String,
    /// Creation time, never changed afterwards.
    pub timestamp: NaiveDateTime,
}

impl RequestRecord {
    pub fn display_reference(&self) -> String {
        self.reference_no
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| self.training_title.to_owned())
    }

    pub fn documents(&self) -> StoredDocuments {
        StoredDocuments {
            memorandum_file: self.memorandum_file.to_owned(),
            activity_matrix_file: self.activity_matrix_file.to_owned(),
        }
    }

    /// Builds the review entry for a decision without touching the record.
    pub fn review(
        &self,
        decision: ReviewDecision,
        remarks: &str,
        at: NaiveDateTime,
    ) -> RequestResult<ReviewEntry> {
        let reference_no = self.reference_no.to_owned().ok_or(RequestException::FeatureDisabled {
            feature: "reference numbers",
        })?;
        let status = self.status.apply(decision).ok_or_else(|| RequestException::NotPending {
            reference_no: reference_no.to_owned(),
            status: self.status,
        })?;
        Ok(ReviewEntry {
            reference_no,
            status,
            admin_remarks: remarks.to_owned(),
            reviewed_at: at,
        })
    }

    /// Only status and remarks change.
    pub fn apply_review(&mut self, entry: &ReviewEntry) {
        self.status = entry.status;
        self.admin_remarks = entry.admin_remarks.to_owned();
    }
}
