use thiserror::Error;

use crate::model::vo::{DocumentKind, ReferenceNo, RequestStatus};

pub type RequestResult<T> = Result<T, RequestException>;

#[derive(Error, Debug)]
pub enum RequestException {
    #[error("Both {} files are required, missing: {}.", .expected_extension.to_uppercase(), display_kinds(.missing))]
    MissingDocuments {
        missing: Vec<DocumentKind>,
        expected_extension: String,
    },

    #[error("The uploaded {kind} is empty.")]
    EmptyDocument { kind: DocumentKind },

    #[error("The uploaded {kind}: {file_name} is not a .{expected_extension} file.")]
    UnsupportedDocument {
        kind: DocumentKind,
        file_name: String,
        expected_extension: String,
    },

    #[error("The field: {field} is required.")]
    MissingField { field: &'static str },

    #[error("Request storage error: {source}")]
    Storage {
        #[source]
        source: anyhow::Error,
    },

    #[error("Admin password is incorrect.")]
    AuthFailed,

    #[error("Admin session is unknown or expired.")]
    SessionExpired,

    #[error("There is no request with reference no: {reference_no}.")]
    NoSuchRecord { reference_no: ReferenceNo },

    #[error("There is no {kind} stored as: {stored_name}.")]
    NoSuchDocument {
        kind: DocumentKind,
        stored_name: String,
    },

    #[error("The request: {reference_no} is already {status} and can't be reviewed again.")]
    NotPending {
        reference_no: ReferenceNo,
        status: RequestStatus,
    },

    #[error("The feature: {feature} is disabled.")]
    FeatureDisabled { feature: &'static str },

    #[error("Request internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl RequestException {
    /// Whether the error was caused by the submitted input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingDocuments { .. }
                | Self::EmptyDocument { .. }
                | Self::UnsupportedDocument { .. }
                | Self::MissingField { .. }
        )
    }
}

impl From<anyhow::Error> for RequestException {
    fn from(e: anyhow::Error) -> Self {
        RequestException::InternalError { source: e }
    }
}

fn display_kinds(kinds: &[DocumentKind]) -> String {
    kinds.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
