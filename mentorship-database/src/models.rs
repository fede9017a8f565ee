use chrono::{DateTime, Utc};
use diesel::prelude::*;
use mentorship_core::person::Person;
use mentorship_core::validation::{
    in_range, max_length, not_in_future, Span, DESCRIPTION_MAX_LENGTH, TITLE_MAX_LENGTH,
};
use mentorship_core::{DomainError, Progress, Suggestion, SuggestionStatus, ThemeSnapshot};
use serde::{Deserialize, Serialize};

use crate::schema::{
    academic_groups, credentials, curators, skills, students, subjects, suggestion_comments,
    suggestion_progresses, suggestions, themes, work_step_comments, work_step_materials,
    work_steps, works,
};

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = skills, check_for_backend(diesel::pg::Pg))]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub level: i16,
}

#[derive(Insertable, AsChangeset, Deserialize, Debug, Clone)]
#[diesel(table_name = skills)]
pub struct SkillForm {
    pub name: String,
    #[serde(default)]
    pub level: i16,
}

impl SkillForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        max_length("name", &self.name, 100)?;
        in_range("level", self.level.into(), 0, 100)
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = subjects, check_for_backend(diesel::pg::Pg))]
pub struct Subject {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, AsChangeset, Deserialize, Debug, Clone)]
#[diesel(table_name = subjects)]
pub struct SubjectForm {
    pub name: String,
}

impl SubjectForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        max_length("name", &self.name, 100)
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = academic_groups, check_for_backend(diesel::pg::Pg))]
pub struct AcademicGroup {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = academic_groups)]
pub struct AcademicGroupForm {
    pub name: String,
}

impl AcademicGroupForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        max_length("name", &self.name, 30)
    }
}

/// A lookup table row, used for suggestion and work step statuses.
#[derive(Queryable, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub id: i32,
    pub name: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = curators, check_for_backend(diesel::pg::Pg))]
pub struct CuratorRow {
    pub id: i32,
    pub name: String,
    pub last_name: String,
    pub patronymic: String,
    pub description: String,
    pub credentials_id: Option<i32>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Curator {
    pub id: i32,
    #[serde(flatten)]
    pub person: Person,
    #[serde(skip)]
    pub credentials_id: Option<i32>,
}

impl From<CuratorRow> for Curator {
    fn from(row: CuratorRow) -> Self {
        Self {
            id: row.id,
            person: Person {
                name: row.name,
                last_name: row.last_name,
                patronymic: row.patronymic,
                description: row.description,
            },
            credentials_id: row.credentials_id,
        }
    }
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = curators)]
pub struct CuratorChanges<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub patronymic: &'a str,
    pub description: &'a str,
}

impl<'a> From<&'a Person> for CuratorChanges<'a> {
    fn from(person: &'a Person) -> Self {
        Self {
            name: &person.name,
            last_name: &person.last_name,
            patronymic: &person.patronymic,
            description: &person.description,
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = students, check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub id: i32,
    pub name: String,
    pub last_name: String,
    pub patronymic: String,
    pub description: String,
    pub credentials_id: Option<i32>,
    pub course_number: i16,
    pub group_id: Option<i32>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i32,
    #[serde(flatten)]
    pub person: Person,
    pub course_number: i16,
    pub group_id: Option<i32>,
    #[serde(skip)]
    pub credentials_id: Option<i32>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            person: Person {
                name: row.name,
                last_name: row.last_name,
                patronymic: row.patronymic,
                description: row.description,
            },
            course_number: row.course_number,
            group_id: row.group_id,
            credentials_id: row.credentials_id,
        }
    }
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = students, treat_none_as_null = true)]
pub struct StudentChanges<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub patronymic: &'a str,
    pub description: &'a str,
    pub course_number: i16,
    pub group_id: Option<i32>,
}

impl<'a> StudentChanges<'a> {
    #[must_use]
    pub fn new(person: &'a Person, course_number: i16, group_id: Option<i32>) -> Self {
        Self {
            name: &person.name,
            last_name: &person.last_name,
            patronymic: &person.patronymic,
            description: &person.description,
            course_number,
            group_id,
        }
    }

    pub fn validate_course(course_number: i16) -> Result<(), DomainError> {
        in_range("course_number", course_number.into(), 1, 4)
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = themes, check_for_backend(diesel::pg::Pg))]
pub struct Theme {
    pub id: i32,
    pub curator_id: Option<i32>,
    pub student_id: Option<i32>,
    pub subject_id: i32,
    pub title: String,
    pub description: String,
    pub date_creation: DateTime<Utc>,
    pub date_acceptance: Option<DateTime<Utc>>,
}

impl Theme {
    #[must_use]
    pub fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            curator_id: self.curator_id,
            student_id: self.student_id,
        }
    }
}

/// Editable theme fields. Curator and student are only assigned on creation
/// or by an accepted suggestion.
#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = themes, treat_none_as_null = true)]
pub struct ThemeChanges {
    pub subject_id: i32,
    pub title: String,
    pub description: String,
    pub date_creation: DateTime<Utc>,
    pub date_acceptance: Option<DateTime<Utc>>,
}

impl ThemeChanges {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        max_length("title", &self.title, TITLE_MAX_LENGTH)?;
        max_length("description", &self.description, DESCRIPTION_MAX_LENGTH)?;
        Span::theme(self.date_creation, self.date_acceptance).validate(now)
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = themes)]
pub struct NewTheme {
    pub curator_id: Option<i32>,
    pub student_id: Option<i32>,
    #[diesel(embed)]
    pub changes: ThemeChanges,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = suggestions, check_for_backend(diesel::pg::Pg))]
pub struct SuggestionRow {
    pub id: i32,
    pub theme_id: i32,
    pub student_id: Option<i32>,
    pub curator_id: Option<i32>,
    pub status_id: i32,
    pub progress_id: Option<i32>,
    pub date_creation: DateTime<Utc>,
}

impl SuggestionRow {
    pub fn into_suggestion(self, status_name: &str) -> Result<Suggestion, DomainError> {
        Ok(Suggestion {
            id: self.id,
            theme_id: self.theme_id,
            student_id: self.student_id,
            curator_id: self.curator_id,
            status: status_name.parse::<SuggestionStatus>()?,
            progress_id: self.progress_id,
            date_creation: self.date_creation,
        })
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = suggestions)]
pub struct NewSuggestion {
    pub theme_id: i32,
    pub student_id: Option<i32>,
    pub curator_id: Option<i32>,
    pub status_id: i32,
    pub date_creation: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = suggestion_progresses, check_for_backend(diesel::pg::Pg))]
pub struct ProgressRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date_update: DateTime<Utc>,
}

impl From<ProgressRow> for Progress {
    fn from(row: ProgressRow) -> Self {
        Self {
            title: row.title,
            description: row.description,
            date_update: row.date_update,
        }
    }
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = suggestion_progresses)]
pub struct ProgressChanges<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub date_update: DateTime<Utc>,
}

impl<'a> From<&'a Progress> for ProgressChanges<'a> {
    fn from(progress: &'a Progress) -> Self {
        Self {
            title: &progress.title,
            description: &progress.description,
            date_update: progress.date_update,
        }
    }
}

/// Body of a new comment. A missing date means now.
#[derive(Deserialize, Debug, Clone)]
pub struct CommentForm {
    pub author_name: String,
    pub content: String,
    pub date_creation: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub author_name: String,
    pub content: String,
    pub date_creation: DateTime<Utc>,
}

impl CommentForm {
    pub fn resolve(self, now: DateTime<Utc>) -> Result<NewComment, DomainError> {
        max_length("author_name", &self.author_name, 100)?;
        max_length("content", &self.content, 500)?;
        let date_creation = self.date_creation.unwrap_or(now);
        not_in_future("date_creation", date_creation, now)?;
        Ok(NewComment {
            author_name: self.author_name,
            content: self.content,
            date_creation,
        })
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = suggestion_comments, check_for_backend(diesel::pg::Pg))]
pub struct SuggestionComment {
    pub id: i32,
    pub suggestion_id: i32,
    pub author_name: String,
    pub content: String,
    pub date_creation: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = work_step_comments, check_for_backend(diesel::pg::Pg))]
pub struct WorkStepComment {
    pub id: i32,
    pub work_step_id: i32,
    pub author_name: String,
    pub content: String,
    pub date_creation: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = works, check_for_backend(diesel::pg::Pg))]
pub struct Work {
    pub id: i32,
    pub theme_id: i32,
    pub date_start: DateTime<Utc>,
    pub date_finish: Option<DateTime<Utc>>,
}

#[derive(Insertable, AsChangeset, Deserialize, Debug, Clone)]
#[diesel(table_name = works, treat_none_as_null = true)]
pub struct WorkForm {
    pub theme_id: i32,
    pub date_start: DateTime<Utc>,
    pub date_finish: Option<DateTime<Utc>>,
}

impl WorkForm {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        Span::work(self.date_start, self.date_finish).validate(now)
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = work_steps, check_for_backend(diesel::pg::Pg))]
pub struct WorkStep {
    pub id: i32,
    pub work_id: i32,
    pub status_id: i32,
    pub title: String,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_finish: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Deserialize, Debug, Clone)]
#[diesel(table_name = work_steps)]
pub struct WorkStepForm {
    pub status_id: i32,
    pub title: String,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_finish: DateTime<Utc>,
}

impl WorkStepForm {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        max_length("title", &self.title, TITLE_MAX_LENGTH)?;
        max_length("description", &self.description, DESCRIPTION_MAX_LENGTH)?;
        Span::step(self.date_start, self.date_finish).validate(now)
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = work_steps)]
pub struct NewWorkStep {
    pub work_id: i32,
    #[diesel(embed)]
    pub form: WorkStepForm,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = work_step_materials, check_for_backend(diesel::pg::Pg))]
pub struct WorkStepMaterial {
    pub id: i32,
    pub step_id: i32,
    pub content: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MaterialForm {
    pub content: String,
}

impl MaterialForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        max_length("content", &self.content, 200)
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = credentials, check_for_backend(diesel::pg::Pg))]
pub struct Credentials {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = credentials)]
pub struct NewCredentials<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn skill_level_is_bounded() {
        let form = SkillForm {
            name: "Rust".to_owned(),
            level: 101,
        };
        assert_eq!(
            form.validate(),
            Err(DomainError::OutOfRange {
                field: "level",
                value: 101,
                min: 0,
                max: 100,
            })
        );
    }

    #[test]
    fn course_number_is_bounded() {
        assert!(StudentChanges::validate_course(1).is_ok());
        assert!(StudentChanges::validate_course(4).is_ok());
        assert!(StudentChanges::validate_course(0).is_err());
        assert!(StudentChanges::validate_course(5).is_err());
    }

    #[test]
    fn theme_acceptance_before_creation_is_rejected() {
        let now = Utc::now();
        let changes = ThemeChanges {
            subject_id: 1,
            title: "Compiler".to_owned(),
            description: String::new(),
            date_creation: now - Duration::days(1),
            date_acceptance: Some(now - Duration::days(2)),
        };
        assert!(matches!(
            changes.validate(now),
            Err(DomainError::DateOrdering { .. })
        ));
    }

    #[test]
    fn comment_defaults_to_now() {
        let now = Utc::now();
        let comment = CommentForm {
            author_name: "Anna".to_owned(),
            content: "Looks good".to_owned(),
            date_creation: None,
        }
        .resolve(now)
        .unwrap();
        assert_eq!(
            comment,
            NewComment {
                author_name: "Anna".to_owned(),
                content: "Looks good".to_owned(),
                date_creation: now,
            }
        );
    }

    #[test]
    fn comment_from_the_future_is_rejected() {
        let now = Utc::now();
        let result = CommentForm {
            author_name: "Anna".to_owned(),
            content: "Later".to_owned(),
            date_creation: Some(now + Duration::minutes(5)),
        }
        .resolve(now);
        assert!(matches!(result, Err(DomainError::FutureDate { .. })));
    }

    #[test]
    fn suggestion_row_with_unknown_status_name_fails() {
        let row = SuggestionRow {
            id: 1,
            theme_id: 1,
            student_id: Some(1),
            curator_id: Some(1),
            status_id: 99,
            progress_id: None,
            date_creation: Utc::now(),
        };
        assert_eq!(
            row.into_suggestion("DONE"),
            Err(DomainError::InvalidStatus("DONE".to_owned()))
        );
    }
}
