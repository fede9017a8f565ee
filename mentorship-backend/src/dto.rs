//! Request and response bodies.
//!
//! `*Ids` shapes reference other rows by id and are used for writes and
//! lists. `*Detail` shapes embed the referenced rows and are returned by
//! single-item reads.

use chrono::{DateTime, Utc};
use mentorship_core::person::Person;
use mentorship_database::models::{
    AcademicGroup, Curator, ProgressRow, Skill, StatusRow, Student, Subject, SuggestionRow,
    Theme, ThemeChanges, Work, WorkStep, WorkStepMaterial,
};
use mentorship_database::suggestions::{StatusRequest, SuggestionRelations};
use mentorship_database::themes::ThemeRelations;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CuratorIds {
    #[serde(flatten)]
    pub person: Person,
    #[serde(default)]
    pub skills: Vec<i32>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CuratorDetail {
    pub id: i32,
    #[serde(flatten)]
    pub person: Person,
    pub skills: Vec<Skill>,
}

impl CuratorDetail {
    #[must_use]
    pub fn new(curator: Curator, skills: Vec<Skill>) -> Self {
        Self {
            id: curator.id,
            person: curator.person,
            skills,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct StudentIds {
    #[serde(flatten)]
    pub person: Person,
    pub course_number: i16,
    pub group_id: Option<i32>,
    #[serde(default)]
    pub skills: Vec<i32>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StudentDetail {
    pub id: i32,
    #[serde(flatten)]
    pub person: Person,
    pub course_number: i16,
    pub group: Option<AcademicGroup>,
    pub skills: Vec<Skill>,
}

impl StudentDetail {
    #[must_use]
    pub fn new(student: Student, group: Option<AcademicGroup>, skills: Vec<Skill>) -> Self {
        Self {
            id: student.id,
            person: student.person,
            course_number: student.course_number,
            group,
            skills,
        }
    }
}

/// Body of a theme create or update. Curator and student are only read on
/// creation.
#[derive(Deserialize, Debug, Clone)]
pub struct ThemeIds {
    pub subject_id: i32,
    pub title: String,
    pub description: String,
    pub date_creation: Option<DateTime<Utc>>,
    pub date_acceptance: Option<DateTime<Utc>>,
    pub curator_id: Option<i32>,
    pub student_id: Option<i32>,
    /// Missing keeps the current skills on update.
    pub skills: Option<Vec<i32>>,
}

impl ThemeIds {
    #[must_use]
    pub fn changes(&self, date_creation: DateTime<Utc>) -> ThemeChanges {
        ThemeChanges {
            subject_id: self.subject_id,
            title: self.title.clone(),
            description: self.description.clone(),
            date_creation: self.date_creation.unwrap_or(date_creation),
            date_acceptance: self.date_acceptance,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ThemeDetail {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date_creation: DateTime<Utc>,
    pub date_acceptance: Option<DateTime<Utc>>,
    pub subject: Subject,
    pub curator: Option<Curator>,
    pub student: Option<Student>,
    pub skills: Vec<Skill>,
}

impl From<ThemeRelations> for ThemeDetail {
    fn from(relations: ThemeRelations) -> Self {
        let ThemeRelations {
            theme,
            subject,
            curator,
            student,
            skills,
        } = relations;
        Self {
            id: theme.id,
            title: theme.title,
            description: theme.description,
            date_creation: theme.date_creation,
            date_acceptance: theme.date_acceptance,
            subject,
            curator,
            student,
            skills,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SuggestionIds {
    pub id: i32,
    pub theme_id: i32,
    pub student_id: Option<i32>,
    pub curator_id: Option<i32>,
    pub status_id: i32,
    pub progress_id: Option<i32>,
    pub date_creation: DateTime<Utc>,
}

impl From<SuggestionRow> for SuggestionIds {
    fn from(row: SuggestionRow) -> Self {
        Self {
            id: row.id,
            theme_id: row.theme_id,
            student_id: row.student_id,
            curator_id: row.curator_id,
            status_id: row.status_id,
            progress_id: row.progress_id,
            date_creation: row.date_creation,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProgressDetail {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date_update: DateTime<Utc>,
}

impl From<ProgressRow> for ProgressDetail {
    fn from(row: ProgressRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            date_update: row.date_update,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SuggestionDetail {
    pub id: i32,
    pub theme: Theme,
    pub student: Option<Student>,
    pub curator: Option<Curator>,
    pub status: StatusRow,
    pub progress: Option<ProgressDetail>,
    pub date_creation: DateTime<Utc>,
}

impl From<SuggestionRelations> for SuggestionDetail {
    fn from(relations: SuggestionRelations) -> Self {
        Self {
            id: relations.row.id,
            theme: relations.theme,
            student: relations.student,
            curator: relations.curator,
            status: relations.status,
            progress: relations.progress.map(ProgressDetail::from),
            date_creation: relations.row.date_creation,
        }
    }
}

/// `PUT` body of a suggestion: the new status by id or by name.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct StatusChange {
    pub status_id: Option<i32>,
    pub status: Option<String>,
}

impl TryFrom<StatusChange> for StatusRequest {
    type Error = AppError;

    fn try_from(change: StatusChange) -> Result<Self, Self::Error> {
        match (change.status_id, change.status) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(name)) => Ok(Self::Name(name)),
            (None, None) => Err(AppError::BadRequest("status_id or status is required")),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkDetail {
    pub id: i32,
    pub theme: Theme,
    pub date_start: DateTime<Utc>,
    pub date_finish: Option<DateTime<Utc>>,
    pub steps: Vec<WorkStep>,
}

impl WorkDetail {
    #[must_use]
    pub fn new(work: Work, theme: Theme, steps: Vec<WorkStep>) -> Self {
        Self {
            id: work.id,
            theme,
            date_start: work.date_start,
            date_finish: work.date_finish,
            steps,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkStepDetail {
    pub id: i32,
    pub work_id: i32,
    pub status: StatusRow,
    pub title: String,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_finish: DateTime<Utc>,
    pub materials: Vec<WorkStepMaterial>,
}

impl WorkStepDetail {
    #[must_use]
    pub fn new(step: WorkStep, status: StatusRow, materials: Vec<WorkStepMaterial>) -> Self {
        Self {
            id: step.id,
            work_id: step.work_id,
            status,
            title: step.title,
            description: step.description,
            date_start: step.date_start,
            date_finish: step.date_finish,
            materials,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn status_id_wins_over_name() {
        let change = StatusChange {
            status_id: Some(7),
            status: Some("ACCEPTED_BOTH".to_owned()),
        };
        assert_eq!(StatusRequest::try_from(change).unwrap(), StatusRequest::Id(7));
        let change: StatusChange =
            serde_json::from_value(json!({"status": "WAITING_CURATOR"})).unwrap();
        assert_eq!(
            StatusRequest::try_from(change).unwrap(),
            StatusRequest::Name("WAITING_CURATOR".to_owned())
        );
    }

    #[test]
    fn empty_status_change_is_rejected() {
        assert!(matches!(
            StatusRequest::try_from(StatusChange::default()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn theme_creation_date_defaults() {
        let fallback = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let body: ThemeIds = serde_json::from_value(json!({
            "subject_id": 2,
            "title": "Distributed cache",
            "description": "Consistent hashing",
        }))
        .unwrap();
        let changes = body.changes(fallback);
        assert_eq!(changes.date_creation, fallback);
        assert_eq!(changes.date_acceptance, None);
        assert_eq!(body.skills, None);
    }

    #[test]
    fn student_body_flattens_person() {
        let body: StudentIds = serde_json::from_value(json!({
            "name": "Anna",
            "last_name": "Petrova",
            "patronymic": "Igorevna",
            "description": "",
            "course_number": 2,
            "group_id": null,
            "skills": [1, 3],
        }))
        .unwrap();
        assert_eq!(body.person.username(), "Anna.Petrova.Igorevna");
        assert_eq!(body.skills, vec![1, 3]);
    }

    #[test]
    fn detail_nests_referenced_rows() {
        let detail = CuratorDetail::new(
            Curator {
                id: 1,
                person: Person {
                    name: "Ivan".to_owned(),
                    last_name: "Sidorov".to_owned(),
                    patronymic: "Petrovich".to_owned(),
                    description: String::new(),
                },
                credentials_id: Some(9),
            },
            vec![Skill {
                id: 4,
                name: "SQL".to_owned(),
                level: 60,
            }],
        );
        assert_eq!(
            serde_json::to_value(detail).unwrap(),
            json!({
                "id": 1,
                "name": "Ivan",
                "last_name": "Sidorov",
                "patronymic": "Petrovich",
                "description": "",
                "skills": [{"id": 4, "name": "SQL", "level": 60}],
            })
        );
    }
}
