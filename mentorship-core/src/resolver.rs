use crate::status::SuggestionStatus;
use crate::suggestion::Suggestion;

/// The status every losing suggestion ends in once a competitor is accepted.
pub const LOSING_STATUS: SuggestionStatus = SuggestionStatus::RejectedCurator;

/// Identifies the suggestions that lose when `winning_student_id` is accepted
/// for `theme_id` under `curator_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Competition {
    pub theme_id: i32,
    pub curator_id: i32,
    pub winning_student_id: i32,
}

impl Competition {
    /// A suggestion without a student competes too: it can never be the
    /// winner.
    #[must_use]
    pub fn competes(&self, suggestion: &Suggestion) -> bool {
        suggestion.theme_id == self.theme_id
            && suggestion.curator_id == Some(self.curator_id)
            && suggestion.student_id != Some(self.winning_student_id)
    }
}

/// Sets every competing suggestion to [`LOSING_STATUS`] and returns how many
/// were touched. Zero matches is fine.
pub fn reject_competing(suggestions: &mut [Suggestion], competition: &Competition) -> usize {
    let mut rejected = 0;
    for suggestion in suggestions
        .iter_mut()
        .filter(|suggestion| competition.competes(suggestion))
    {
        suggestion.status = LOSING_STATUS;
        rejected += 1;
    }
    rejected
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn suggestion(id: i32, theme_id: i32, curator_id: i32, student_id: Option<i32>) -> Suggestion {
        Suggestion {
            id,
            theme_id,
            student_id,
            curator_id: Some(curator_id),
            status: SuggestionStatus::WaitingCurator,
            progress_id: None,
            date_creation: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn rejects_everyone_but_the_winner() {
        let mut suggestions: Vec<_> = (1..=5)
            .map(|student| suggestion(student, 1, 10, Some(student)))
            .collect();
        let rejected = reject_competing(
            &mut suggestions,
            &Competition {
                theme_id: 1,
                curator_id: 10,
                winning_student_id: 3,
            },
        );
        assert_eq!(rejected, 4);
        for suggestion in &suggestions {
            let expected = if suggestion.student_id == Some(3) {
                SuggestionStatus::WaitingCurator
            } else {
                SuggestionStatus::RejectedCurator
            };
            assert_eq!(suggestion.status, expected);
        }
    }

    #[test]
    fn other_themes_and_curators_are_untouched() {
        let mut suggestions = vec![
            suggestion(1, 1, 10, Some(1)),
            suggestion(2, 2, 10, Some(2)),
            suggestion(3, 1, 11, Some(2)),
            suggestion(4, 1, 10, None),
        ];
        let rejected = reject_competing(
            &mut suggestions,
            &Competition {
                theme_id: 1,
                curator_id: 10,
                winning_student_id: 1,
            },
        );
        assert_eq!(rejected, 1);
        let statuses: Vec<_> = suggestions.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                SuggestionStatus::WaitingCurator,
                SuggestionStatus::WaitingCurator,
                SuggestionStatus::WaitingCurator,
                SuggestionStatus::RejectedCurator,
            ]
        );
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let mut suggestions = vec![suggestion(1, 1, 10, Some(1))];
        let competition = Competition {
            theme_id: 1,
            curator_id: 10,
            winning_student_id: 1,
        };
        assert_eq!(reject_competing(&mut suggestions, &competition), 0);
        assert_eq!(reject_competing(&mut [], &competition), 0);
    }
}
