//! Suggestions and their negotiation.
//!
//! [`change_status`] runs the transition engine and writes every side effect
//! plus the new status in one transaction.

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use mentorship_core::resolver::LOSING_STATUS;
use mentorship_core::validation::not_in_future;
use mentorship_core::{
    apply_transition, Competition, DomainError, Progress, ProgressEdit, SideEffect, Snapshot,
    SuggestionStatus, Transition,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DatabaseError, Found};
use crate::models::{
    CommentForm, Curator, NewSuggestion, ProgressChanges, ProgressRow, StatusRow, Student,
    SuggestionComment, SuggestionRow, Theme,
};
use crate::schema::{suggestion_comments, suggestion_progresses, suggestions, themes};
use crate::{catalog, people, Owner};

#[derive(Deserialize, Debug, Clone)]
pub struct SuggestionForm {
    pub theme_id: i32,
    pub student_id: Option<i32>,
    pub curator_id: Option<i32>,
    /// Defaults to "no response". Only open statuses are accepted.
    pub status_id: Option<i32>,
    pub date_creation: Option<DateTime<Utc>>,
}

/// The requested new status, by lookup id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusRequest {
    Id(i32),
    Name(String),
}

#[derive(Debug, Clone)]
pub struct SuggestionRelations {
    pub row: SuggestionRow,
    pub theme: Theme,
    pub student: Option<Student>,
    pub curator: Option<Curator>,
    pub status: StatusRow,
    pub progress: Option<ProgressRow>,
}

fn scoped(owner: Owner) -> suggestions::BoxedQuery<'static, Pg> {
    match owner {
        Owner::Curator(id) => suggestions::table
            .filter(suggestions::curator_id.eq(id))
            .into_boxed(),
        Owner::Student(id) => suggestions::table
            .filter(suggestions::student_id.eq(id))
            .into_boxed(),
    }
}

pub async fn list_suggestions(
    conn: &mut AsyncPgConnection,
    owner: Owner,
) -> Result<Vec<SuggestionRow>, DatabaseError> {
    Ok(scoped(owner)
        .order(suggestions::id)
        .select(SuggestionRow::as_select())
        .load(conn)
        .await?)
}

pub async fn get_suggestion(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    id: i32,
) -> Result<SuggestionRow, DatabaseError> {
    scoped(owner)
        .filter(suggestions::id.eq(id))
        .select(SuggestionRow::as_select())
        .first(conn)
        .await
        .optional()
        .found("suggestion")
}

pub async fn load_relations(
    conn: &mut AsyncPgConnection,
    row: SuggestionRow,
) -> Result<SuggestionRelations, DatabaseError> {
    let theme = themes::table
        .find(row.theme_id)
        .select(Theme::as_select())
        .first(conn)
        .await
        .optional()
        .found("theme")?;
    let student = match row.student_id {
        Some(id) => Some(people::get_student(conn, id).await?),
        None => None,
    };
    let curator = match row.curator_id {
        Some(id) => Some(people::get_curator(conn, id).await?),
        None => None,
    };
    let status = StatusRow {
        id: row.status_id,
        name: catalog::suggestion_status_name(conn, row.status_id)
            .await?
            .ok_or(DatabaseError::NotFound("suggestion status"))?,
    };
    let progress = match row.progress_id {
        Some(id) => suggestion_progresses::table
            .find(id)
            .select(ProgressRow::as_select())
            .first(conn)
            .await
            .optional()?,
        None => None,
    };
    Ok(SuggestionRelations {
        row,
        theme,
        student,
        curator,
        status,
        progress,
    })
}

/// The path's curator or student always ends up on their side of the
/// suggestion.
pub async fn create_suggestion(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    form: SuggestionForm,
) -> Result<SuggestionRow, DatabaseError> {
    let now = Utc::now();
    let date_creation = form.date_creation.unwrap_or(now);
    not_in_future("date_creation", date_creation, now)?;
    let status = match form.status_id {
        Some(id) => catalog::suggestion_status_name(conn, id)
            .await?
            .ok_or_else(|| DomainError::InvalidStatus(id.to_string()))?
            .parse::<SuggestionStatus>()?,
        None => SuggestionStatus::default(),
    };
    let status_id = catalog::suggestion_status_id(conn, status.check_initial()?).await?;
    let (student_id, curator_id) = match owner {
        Owner::Curator(id) => (form.student_id, Some(id)),
        Owner::Student(id) => (Some(id), form.curator_id),
    };
    Ok(diesel::insert_into(suggestions::table)
        .values(NewSuggestion {
            theme_id: form.theme_id,
            student_id,
            curator_id,
            status_id,
            date_creation,
        })
        .returning(SuggestionRow::as_returning())
        .get_result(conn)
        .await?)
}

/// Removes the suggestion together with its progress draft.
pub async fn delete_suggestion(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    id: i32,
) -> Result<(), DatabaseError> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            let row = get_suggestion(conn, owner, id).await?;
            diesel::delete(suggestions::table.find(id))
                .execute(conn)
                .await?;
            if let Some(progress_id) = row.progress_id {
                diesel::delete(suggestion_progresses::table.find(progress_id))
                    .execute(conn)
                    .await?;
            }
            Ok(())
        }
        .scope_boxed()
    })
    .await
}

/// Moves the suggestion to the requested status on behalf of `owner`.
pub async fn change_status(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    suggestion_id: i32,
    request: StatusRequest,
) -> Result<SuggestionRow, DatabaseError> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            let row = get_suggestion(conn, owner, suggestion_id).await?;
            let current_name = catalog::suggestion_status_name(conn, row.status_id)
                .await?
                .ok_or(DatabaseError::NotFound("suggestion status"))?;
            let current = row.into_suggestion(&current_name)?;

            let new_status = match request {
                StatusRequest::Name(name) => name,
                StatusRequest::Id(id) => catalog::suggestion_status_name(conn, id)
                    .await?
                    .ok_or_else(|| DomainError::InvalidStatus(id.to_string()))?,
            };

            let theme = themes::table
                .find(current.theme_id)
                .select(Theme::as_select())
                .first(conn)
                .await
                .optional()?;
            let theme = theme.as_ref().map(Theme::snapshot);
            let progress = match current.progress_id {
                Some(id) => suggestion_progresses::table
                    .find(id)
                    .select(ProgressRow::as_select())
                    .first(conn)
                    .await
                    .optional()?
                    .map(Progress::from),
                None => None,
            };

            let transition = apply_transition(
                &current,
                &new_status,
                owner.party(),
                &Snapshot {
                    theme: theme.as_ref(),
                    progress: progress.as_ref(),
                    now: Utc::now(),
                },
            )?;
            let progress_id = apply_effects(conn, &transition).await?;

            let status_id = catalog::suggestion_status_id(conn, transition.suggestion.status).await?;
            Ok(diesel::update(suggestions::table.find(suggestion_id))
                .set((
                    suggestions::status_id.eq(status_id),
                    suggestions::progress_id.eq(progress_id),
                ))
                .returning(SuggestionRow::as_returning())
                .get_result(conn)
                .await?)
        }
        .scope_boxed()
    })
    .await
}

/// Writes the side effects in order and returns the suggestion's progress id
/// afterwards.
async fn apply_effects(
    conn: &mut AsyncPgConnection,
    transition: &Transition,
) -> Result<Option<i32>, DatabaseError> {
    let mut progress_id = transition.suggestion.progress_id;
    for effect in &transition.effects {
        match effect {
            SideEffect::CreateProgress => {
                let progress = transition
                    .progress
                    .as_ref()
                    .ok_or(DatabaseError::NotFound("progress"))?;
                let id = diesel::insert_into(suggestion_progresses::table)
                    .values(ProgressChanges::from(progress))
                    .returning(suggestion_progresses::id)
                    .get_result(conn)
                    .await?;
                debug!(suggestion = transition.suggestion.id, progress = id, "created progress");
                progress_id = Some(id);
            }
            SideEffect::MergeTheme(merge) => {
                diesel::update(themes::table.find(merge.theme_id))
                    .set((
                        themes::title.eq(&merge.title),
                        themes::description.eq(&merge.description),
                        themes::curator_id.eq(merge.curator_id),
                        themes::student_id.eq(merge.student_id),
                    ))
                    .execute(conn)
                    .await?;
                info!(
                    theme = merge.theme_id,
                    curator = merge.curator_id,
                    student = merge.student_id,
                    "theme assigned"
                );
            }
            SideEffect::RejectCompeting(competition) => {
                let rejected = reject_competing(conn, competition).await?;
                debug!(theme = competition.theme_id, rejected, "rejected competing suggestions");
            }
            SideEffect::TouchProgress => {
                if let (Some(id), Some(progress)) = (progress_id, &transition.progress) {
                    diesel::update(suggestion_progresses::table.find(id))
                        .set(suggestion_progresses::date_update.eq(progress.date_update))
                        .execute(conn)
                        .await?;
                }
            }
        }
    }
    Ok(progress_id)
}

/// Bulk version of [`Competition::competes`]: a suggestion without a student
/// is rejected too.
pub async fn reject_competing(
    conn: &mut AsyncPgConnection,
    competition: &Competition,
) -> Result<usize, DatabaseError> {
    let losing = catalog::suggestion_status_id(conn, LOSING_STATUS).await?;
    Ok(diesel::update(
        suggestions::table
            .filter(suggestions::theme_id.eq(competition.theme_id))
            .filter(suggestions::curator_id.eq(competition.curator_id))
            .filter(suggestions::student_id.is_distinct_from(competition.winning_student_id)),
    )
    .set(suggestions::status_id.eq(losing))
    .execute(conn)
    .await?)
}

pub async fn get_progress(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    suggestion_id: i32,
) -> Result<ProgressRow, DatabaseError> {
    let row = get_suggestion(conn, owner, suggestion_id).await?;
    let progress_id = row.progress_id.ok_or(DatabaseError::NotFound("progress"))?;
    suggestion_progresses::table
        .find(progress_id)
        .select(ProgressRow::as_select())
        .first(conn)
        .await
        .optional()
        .found("progress")
}

/// Edits the draft. Every successful edit touches `date_update`.
pub async fn edit_progress(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    suggestion_id: i32,
    edit: ProgressEdit,
) -> Result<ProgressRow, DatabaseError> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            let current = get_progress(conn, owner, suggestion_id).await?;
            let id = current.id;
            let mut progress = Progress::from(current);
            edit.apply(&mut progress, Utc::now())?;
            Ok(diesel::update(suggestion_progresses::table.find(id))
                .set(ProgressChanges::from(&progress))
                .returning(ProgressRow::as_returning())
                .get_result(conn)
                .await?)
        }
        .scope_boxed()
    })
    .await
}

pub async fn list_comments(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    suggestion_id: i32,
) -> Result<Vec<SuggestionComment>, DatabaseError> {
    get_suggestion(conn, owner, suggestion_id).await?;
    Ok(suggestion_comments::table
        .filter(suggestion_comments::suggestion_id.eq(suggestion_id))
        .order(suggestion_comments::id)
        .select(SuggestionComment::as_select())
        .load(conn)
        .await?)
}

pub async fn create_comment(
    conn: &mut AsyncPgConnection,
    owner: Owner,
    suggestion_id: i32,
    form: CommentForm,
) -> Result<SuggestionComment, DatabaseError> {
    let comment = form.resolve(Utc::now())?;
    get_suggestion(conn, owner, suggestion_id).await?;
    Ok(diesel::insert_into(suggestion_comments::table)
        .values((
            suggestion_comments::suggestion_id.eq(suggestion_id),
            suggestion_comments::author_name.eq(comment.author_name),
            suggestion_comments::content.eq(comment.content),
            suggestion_comments::date_creation.eq(comment.date_creation),
        ))
        .returning(SuggestionComment::as_returning())
        .get_result(conn)
        .await?)
}
