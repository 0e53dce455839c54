use std::{fmt, path::Path, str::FromStr};

use anyhow::anyhow;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of the timestamp prefixed to stored document names.
pub const STORED_NAME_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The two supporting documents required per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Memorandum,
    ActivityMatrix,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Memorandum, DocumentKind::ActivityMatrix];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Memorandum => "memorandum",
            Self::ActivityMatrix => "activity-matrix",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memorandum => "memorandum",
            Self::ActivityMatrix => "activity matrix",
        })
    }
}

impl FromStr for DocumentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "activity_matrix" {
            return Ok(Self::ActivityMatrix);
        }
        Self::ALL
            .into_iter()
            .find(|el| el.slug() == s)
            .ok_or_else(|| anyhow!("Unknown document kind: {s}"))
    }
}

/// An uploaded document as received from the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Final path component of the uploaded name.
    pub fn base_name(&self) -> &str {
        let normalized = self.file_name.rsplit(['/', '\\']).next().unwrap_or_default();
        normalized.trim()
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        Path::new(self.base_name())
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
    }

    /// `<YYYYMMDDHHMMSS>_<original-name>`.
    pub fn stored_name(&self, at: NaiveDateTime) -> String {
        format!("{}_{}", at.format(STORED_NAME_TIMESTAMP_FORMAT), self.base_name())
    }
}

/// Names under which a submission's documents were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocuments {
    pub memorandum_file: String,
    pub activity_matrix_file: String,
}

impl StoredDocuments {
    pub fn name_of(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Memorandum => &self.memorandum_file,
            DocumentKind::ActivityMatrix => &self.activity_matrix_file,
        }
    }
}
