use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::DomainError;
use crate::suggestion::ThemeSnapshot;
use crate::validation::{max_length, DESCRIPTION_MAX_LENGTH, TITLE_MAX_LENGTH};

/// Draft of a theme's title and description edited while a suggestion is
/// being negotiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub title: String,
    pub description: String,
    pub date_update: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressSnapshot {
    Existing(Progress),
    Created(Progress),
}

impl ProgressSnapshot {
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    #[must_use]
    pub fn into_inner(self) -> Progress {
        match self {
            Self::Existing(progress) | Self::Created(progress) => progress,
        }
    }
}

/// Returns the existing progress unchanged, or a new one copied from the
/// theme as it is right now.
#[must_use]
pub fn get_or_create_progress(
    existing: Option<&Progress>,
    theme: &ThemeSnapshot,
    now: DateTime<Utc>,
) -> ProgressSnapshot {
    existing.map_or_else(
        || {
            ProgressSnapshot::Created(Progress {
                title: theme.title.clone(),
                description: theme.description.clone(),
                date_update: now,
            })
        },
        |progress| ProgressSnapshot::Existing(progress.clone()),
    )
}

pub fn touch(progress: &mut Progress, now: DateTime<Utc>) {
    progress.date_update = now;
}

/// Body of a progress update. Missing fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressEdit {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ProgressEdit {
    pub fn apply(self, progress: &mut Progress, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            max_length("title", title, TITLE_MAX_LENGTH)?;
        }
        if let Some(description) = &self.description {
            max_length("description", description, DESCRIPTION_MAX_LENGTH)?;
        }
        if let Some(title) = self.title {
            progress.title = title;
        }
        if let Some(description) = self.description {
            progress.description = description;
        }
        touch(progress, now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    fn theme() -> ThemeSnapshot {
        ThemeSnapshot {
            id: 7,
            title: "Anthropomorphic robot".to_owned(),
            description: "Walking gait controller".to_owned(),
            curator_id: None,
            student_id: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn creates_from_current_theme() {
        let snapshot = get_or_create_progress(None, &theme(), now());
        assert!(snapshot.is_created());
        assert_eq!(
            snapshot.into_inner(),
            Progress {
                title: "Anthropomorphic robot".to_owned(),
                description: "Walking gait controller".to_owned(),
                date_update: now(),
            }
        );
    }

    #[test]
    fn existing_progress_is_returned_unchanged() {
        let existing = Progress {
            title: "Edited".to_owned(),
            description: "Edited description".to_owned(),
            date_update: now() - Duration::days(2),
        };
        let snapshot = get_or_create_progress(Some(&existing), &theme(), now());
        assert_eq!(snapshot, ProgressSnapshot::Existing(existing));
    }

    #[test]
    fn edit_keeps_missing_fields_and_touches() {
        let mut progress = get_or_create_progress(None, &theme(), now() - Duration::hours(3))
            .into_inner();
        ProgressEdit {
            title: Some("Biped robot".to_owned()),
            description: None,
        }
        .apply(&mut progress, now())
        .unwrap();
        assert_eq!(progress.title, "Biped robot");
        assert_eq!(progress.description, "Walking gait controller");
        assert_eq!(progress.date_update, now());
    }

    #[test]
    fn rejected_edit_changes_nothing() {
        let mut progress = get_or_create_progress(None, &theme(), now()).into_inner();
        let before = progress.clone();
        let result = ProgressEdit {
            title: Some("ok".to_owned()),
            description: Some("d".repeat(DESCRIPTION_MAX_LENGTH + 1)),
        }
        .apply(&mut progress, now() + Duration::minutes(1));
        assert!(result.is_err());
        assert_eq!(progress, before);
    }
}
