use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::status::SuggestionStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown suggestion status {0:?}")]
    InvalidStatus(String),
    #[error("a new suggestion cannot start as {0}")]
    InitialStatus(SuggestionStatus),
    #[error("suggestion {suggestion_id} has no {missing}")]
    IncompleteSuggestion {
        suggestion_id: i32,
        missing: &'static str,
    },
    #[error("{start_field} ({start}) is later than {end_field} ({end})")]
    DateOrdering {
        start_field: &'static str,
        start: DateTime<Utc>,
        end_field: &'static str,
        end: DateTime<Utc>,
    },
    #[error("{field} ({value}) is in the future")]
    FutureDate {
        field: &'static str,
        value: DateTime<Utc>,
    },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field} must not be longer than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl DomainError {
    /// Whether the error describes rejected input rather than misuse of the
    /// transition engine.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InitialStatus(_)
                | Self::DateOrdering { .. }
                | Self::FutureDate { .. }
                | Self::OutOfRange { .. }
                | Self::TooLong { .. }
        )
    }
}
