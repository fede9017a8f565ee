use core::fmt::{self, Display};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Negotiation state of a suggestion. The names are the ones stored in the
/// `Suggestion_theme_status` lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SuggestionStatus {
    #[default]
    #[serde(rename = "no response")]
    NoResponse,
    #[serde(rename = "WAITING_STUDENT")]
    WaitingStudent,
    #[serde(rename = "WAITING_CURATOR")]
    WaitingCurator,
    #[serde(rename = "IN_PROGRESS_STUDENT")]
    InProgressStudent,
    #[serde(rename = "IN_PROGRESS_CURATOR")]
    InProgressCurator,
    #[serde(rename = "REJECTED_STUDENT")]
    RejectedStudent,
    #[serde(rename = "REJECTED_CURATOR")]
    RejectedCurator,
    #[serde(rename = "ACCEPTED_BOTH")]
    AcceptedBoth,
}

impl SuggestionStatus {
    pub const ALL: [Self; 8] = [
        Self::NoResponse,
        Self::WaitingStudent,
        Self::WaitingCurator,
        Self::InProgressStudent,
        Self::InProgressCurator,
        Self::RejectedStudent,
        Self::RejectedCurator,
        Self::AcceptedBoth,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoResponse => "no response",
            Self::WaitingStudent => "WAITING_STUDENT",
            Self::WaitingCurator => "WAITING_CURATOR",
            Self::InProgressStudent => "IN_PROGRESS_STUDENT",
            Self::InProgressCurator => "IN_PROGRESS_CURATOR",
            Self::RejectedStudent => "REJECTED_STUDENT",
            Self::RejectedCurator => "REJECTED_CURATOR",
            Self::AcceptedBoth => "ACCEPTED_BOTH",
        }
    }

    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgressStudent | Self::InProgressCurator)
    }

    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::RejectedStudent | Self::RejectedCurator)
    }

    /// New suggestions start unanswered or waiting on one side. Every other
    /// status is only reachable through a transition.
    pub const fn check_initial(self) -> Result<Self, DomainError> {
        match self {
            Self::NoResponse | Self::WaitingStudent | Self::WaitingCurator => Ok(self),
            _ => Err(DomainError::InitialStatus(self)),
        }
    }
}

impl Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SuggestionStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name() == value)
            .ok_or_else(|| DomainError::InvalidStatus(value.to_owned()))
    }
}

/// Which side of the negotiation asked for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Curator,
    Student,
}

impl Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curator => f.write_str("curator"),
            Self::Student => f.write_str("student"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("WAITING_STUDENT", SuggestionStatus::WaitingStudent)]
    #[case("IN_PROGRESS_CURATOR", SuggestionStatus::InProgressCurator)]
    #[case("REJECTED_CURATOR", SuggestionStatus::RejectedCurator)]
    #[case("ACCEPTED_BOTH", SuggestionStatus::AcceptedBoth)]
    #[case("no response", SuggestionStatus::NoResponse)]
    fn parses_stored_names(#[case] name: &str, #[case] expected: SuggestionStatus) {
        assert_eq!(name.parse::<SuggestionStatus>(), Ok(expected));
        assert_eq!(expected.to_string(), name);
    }

    #[rstest]
    #[case("accepted_both")]
    #[case("")]
    #[case("DONE")]
    fn unknown_names_are_invalid(#[case] name: &str) {
        assert_eq!(
            name.parse::<SuggestionStatus>(),
            Err(DomainError::InvalidStatus(name.to_owned()))
        );
    }

    #[rstest]
    #[case(SuggestionStatus::NoResponse, true)]
    #[case(SuggestionStatus::WaitingStudent, true)]
    #[case(SuggestionStatus::WaitingCurator, true)]
    #[case(SuggestionStatus::InProgressCurator, false)]
    #[case(SuggestionStatus::RejectedStudent, false)]
    #[case(SuggestionStatus::AcceptedBoth, false)]
    fn only_open_statuses_are_initial(#[case] status: SuggestionStatus, #[case] allowed: bool) {
        let expected = if allowed {
            Ok(status)
        } else {
            Err(DomainError::InitialStatus(status))
        };
        assert_eq!(status.check_initial(), expected);
    }

    #[test]
    fn serde_uses_stored_names() {
        for status in SuggestionStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.name()));
            assert_eq!(serde_json::from_str::<SuggestionStatus>(&json).unwrap(), status);
        }
    }
}
