//! Guards every entity runs before it is written.
//!
//! All date checks compare full UTC timestamps against the clock reading taken
//! when the write starts, so a value equal to `now` is accepted and anything
//! later is rejected.

use chrono::{DateTime, Utc};

use crate::error::DomainError;

/// Limits shared by themes and their negotiation drafts, so a draft copied
/// from a theme always fits.
pub const TITLE_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 250;

pub fn not_in_future(
    field: &'static str,
    value: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if value > now {
        return Err(DomainError::FutureDate { field, value });
    }
    Ok(())
}

pub fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), DomainError> {
    if value < min || value > max {
        return Err(DomainError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

pub fn max_length(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::TooLong { field, max });
    }
    Ok(())
}

/// A start timestamp with an optional end, as carried by themes (creation and
/// acceptance), works and work steps.
#[derive(Debug, Clone, Copy)]
pub struct Span {
    start_field: &'static str,
    start: DateTime<Utc>,
    end_field: &'static str,
    end: Option<DateTime<Utc>>,
}

impl Span {
    #[must_use]
    pub const fn theme(creation: DateTime<Utc>, acceptance: Option<DateTime<Utc>>) -> Self {
        Self {
            start_field: "date_creation",
            start: creation,
            end_field: "date_acceptance",
            end: acceptance,
        }
    }

    #[must_use]
    pub const fn work(start: DateTime<Utc>, finish: Option<DateTime<Utc>>) -> Self {
        Self {
            start_field: "date_start",
            start,
            end_field: "date_finish",
            end: finish,
        }
    }

    #[must_use]
    pub const fn step(start: DateTime<Utc>, finish: DateTime<Utc>) -> Self {
        Self::work(start, Some(finish))
    }

    /// Ordering is checked first, then every present value against `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(end) = self.end {
            if self.start > end {
                return Err(DomainError::DateOrdering {
                    start_field: self.start_field,
                    start: self.start,
                    end_field: self.end_field,
                    end,
                });
            }
        }
        not_in_future(self.start_field, self.start, now)?;
        if let Some(end) = self.end {
            not_in_future(self.end_field, end, now)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn work_starting_tomorrow_is_in_the_future() {
        let tomorrow = now() + Duration::days(1);
        assert_eq!(
            Span::work(tomorrow, None).validate(now()),
            Err(DomainError::FutureDate {
                field: "date_start",
                value: tomorrow,
            })
        );
    }

    #[test]
    fn start_after_end_is_a_date_ordering_error() {
        let start = now() - Duration::hours(1);
        let end = now() - Duration::hours(2);
        assert_eq!(
            Span::step(start, end).validate(now()),
            Err(DomainError::DateOrdering {
                start_field: "date_start",
                start,
                end_field: "date_finish",
                end,
            })
        );
    }

    #[test]
    fn same_day_but_later_time_is_still_future() {
        let later_today = now() + Duration::minutes(5);
        assert!(matches!(
            Span::theme(later_today, None).validate(now()),
            Err(DomainError::FutureDate { .. })
        ));
    }

    #[test]
    fn earlier_day_with_later_time_of_day_is_accepted() {
        let yesterday_evening = now() - Duration::hours(16);
        assert_eq!(Span::theme(yesterday_evening, Some(now())).validate(now()), Ok(()));
    }

    #[test]
    fn acceptance_in_the_future_is_rejected() {
        let acceptance = now() + Duration::seconds(1);
        assert_eq!(
            Span::theme(now() - Duration::days(3), Some(acceptance)).validate(now()),
            Err(DomainError::FutureDate {
                field: "date_acceptance",
                value: acceptance,
            })
        );
    }

    #[test]
    fn ranges_and_lengths() {
        assert_eq!(in_range("level", 100, 0, 100), Ok(()));
        assert!(in_range("course_number", 5, 1, 4).is_err());
        assert_eq!(max_length("name", "Ирина", 5), Ok(()));
        assert_eq!(
            max_length("name", "Ирина!", 5),
            Err(DomainError::TooLong {
                field: "name",
                max: 5
            })
        );
    }
}
