//! The suggestion negotiation state machine.
//!
//! [`apply_transition`] never touches storage. It returns the updated
//! suggestion together with an ordered list of [`SideEffect`]s that the
//! caller has to persist, ideally inside one transaction.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::DomainError;
use crate::progress::{get_or_create_progress, touch, Progress};
use crate::resolver::Competition;
use crate::status::{Party, SuggestionStatus};
use crate::suggestion::{Suggestion, ThemeSnapshot};

/// What the engine may look at besides the suggestion itself.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub theme: Option<&'a ThemeSnapshot>,
    pub progress: Option<&'a Progress>,
    pub now: DateTime<Utc>,
}

/// New values for the theme once both sides agreed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeMerge {
    pub theme_id: i32,
    pub title: String,
    pub description: String,
    pub curator_id: i32,
    pub student_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Insert [`Transition::progress`] as a new row and link it to the
    /// suggestion.
    CreateProgress,
    /// Overwrite the theme. This has to be written even if no value changed,
    /// triggers on the theme table depend on the update.
    MergeTheme(ThemeMerge),
    RejectCompeting(Competition),
    /// Store the new `date_update` of [`Transition::progress`].
    TouchProgress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub party: Party,
    /// The suggestion with its new status. `progress_id` is left alone, a
    /// created progress only gets an id once it is stored.
    pub suggestion: Suggestion,
    pub progress: Option<Progress>,
    pub effects: Vec<SideEffect>,
}

impl Transition {
    #[must_use]
    pub fn creates_progress(&self) -> bool {
        self.effects.contains(&SideEffect::CreateProgress)
    }

    #[must_use]
    pub fn theme_merge(&self) -> Option<&ThemeMerge> {
        self.effects.iter().find_map(|effect| match effect {
            SideEffect::MergeTheme(merge) => Some(merge),
            _ => None,
        })
    }

    #[must_use]
    pub fn competition(&self) -> Option<&Competition> {
        self.effects.iter().find_map(|effect| match effect {
            SideEffect::RejectCompeting(competition) => Some(competition),
            _ => None,
        })
    }
}

/// Moves `suggestion` to the status called `new_status`.
pub fn apply_transition(
    suggestion: &Suggestion,
    new_status: &str,
    party: Party,
    snapshot: &Snapshot<'_>,
) -> Result<Transition, DomainError> {
    transition_to(suggestion, new_status.parse()?, party, snapshot)
}

pub fn transition_to(
    suggestion: &Suggestion,
    status: SuggestionStatus,
    party: Party,
    snapshot: &Snapshot<'_>,
) -> Result<Transition, DomainError> {
    if suggestion.status.is_rejected() && status != suggestion.status {
        debug!(
            suggestion = suggestion.id,
            from = %suggestion.status,
            to = %status,
            "reopening a rejected suggestion"
        );
    }

    let mut progress = snapshot.progress.cloned();
    let mut effects = Vec::new();

    match status {
        SuggestionStatus::NoResponse
        | SuggestionStatus::WaitingStudent
        | SuggestionStatus::WaitingCurator
        | SuggestionStatus::RejectedStudent
        | SuggestionStatus::RejectedCurator => {}
        SuggestionStatus::InProgressStudent | SuggestionStatus::InProgressCurator => {
            let theme = require_theme(suggestion, snapshot)?;
            let current = get_or_create_progress(snapshot.progress, theme, snapshot.now);
            if current.is_created() {
                effects.push(SideEffect::CreateProgress);
            }
            progress = Some(current.into_inner());
        }
        SuggestionStatus::AcceptedBoth => {
            let theme = require_theme(suggestion, snapshot)?;
            let curator_id = suggestion.require_curator()?;
            let student_id = suggestion.require_student()?;
            let (title, description) = progress.as_ref().map_or_else(
                || (theme.title.clone(), theme.description.clone()),
                |progress| (progress.title.clone(), progress.description.clone()),
            );
            effects.push(SideEffect::MergeTheme(ThemeMerge {
                theme_id: theme.id,
                title,
                description,
                curator_id,
                student_id,
            }));
            effects.push(SideEffect::RejectCompeting(Competition {
                theme_id: theme.id,
                curator_id,
                winning_student_id: student_id,
            }));
        }
    }

    if let Some(progress) = &mut progress {
        touch(progress, snapshot.now);
        effects.push(SideEffect::TouchProgress);
    }

    debug!(
        suggestion = suggestion.id,
        %party,
        from = %suggestion.status,
        to = %status,
        effects = effects.len(),
        "suggestion transition"
    );

    Ok(Transition {
        party,
        suggestion: Suggestion {
            status,
            ..suggestion.clone()
        },
        progress,
        effects,
    })
}

fn require_theme<'a>(
    suggestion: &Suggestion,
    snapshot: &Snapshot<'a>,
) -> Result<&'a ThemeSnapshot, DomainError> {
    snapshot
        .theme
        .filter(|theme| theme.id == suggestion.theme_id)
        .ok_or(DomainError::IncompleteSuggestion {
            suggestion_id: suggestion.id,
            missing: "theme",
        })
}
