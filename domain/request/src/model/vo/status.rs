use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a request record.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Returned,
}

/// Administrator decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewDecision {
    Approve,
    Return,
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Next status after a decision, `None` when the status is terminal.
    pub fn apply(&self, decision: ReviewDecision) -> Option<Self> {
        match (self, decision) {
            (Self::Pending, decision) => Some(decision.into()),
            (Self::Approved | Self::Returned, _) => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Returned => "Returned",
        })
    }
}

impl From<ReviewDecision> for RequestStatus {
    fn from(value: ReviewDecision) -> Self {
        match value {
            ReviewDecision::Approve => Self::Approved,
            ReviewDecision::Return => Self::Returned,
        }
    }
}
