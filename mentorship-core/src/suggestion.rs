use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::status::SuggestionStatus;

/// One proposed pairing of a student to a theme under a curator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub id: i32,
    pub theme_id: i32,
    pub student_id: Option<i32>,
    pub curator_id: Option<i32>,
    pub status: SuggestionStatus,
    pub progress_id: Option<i32>,
    pub date_creation: DateTime<Utc>,
}

impl Suggestion {
    pub(crate) fn require_student(&self) -> Result<i32, DomainError> {
        self.student_id
            .ok_or(DomainError::IncompleteSuggestion {
                suggestion_id: self.id,
                missing: "student",
            })
    }

    pub(crate) fn require_curator(&self) -> Result<i32, DomainError> {
        self.curator_id
            .ok_or(DomainError::IncompleteSuggestion {
                suggestion_id: self.id,
                missing: "curator",
            })
    }
}

/// The fields of a theme that negotiation reads and may overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSnapshot {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub curator_id: Option<i32>,
    pub student_id: Option<i32>,
}
