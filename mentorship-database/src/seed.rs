//! Loads a JSON fixture file into an empty database.
//!
//! People get a login named `name.last_name.patronymic`. Without an explicit
//! password the username doubles as password. Themes are referenced by
//! title.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use mentorship_core::person::Person;
use mentorship_core::SuggestionStatus;
use serde::Deserialize;
use tracing::info;

use crate::auth::{create_credentials, CURATORS_GROUP, STUDENTS_GROUP};
use crate::error::DatabaseError;
use crate::models::{
    AcademicGroupForm, CommentForm, MaterialForm, NewTheme, SkillForm, SubjectForm, ThemeChanges,
    WorkForm, WorkStepForm,
};
use crate::suggestions::SuggestionForm;
use crate::{catalog, people, suggestions, themes, works, Owner};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Fixtures {
    pub skills: Vec<SkillForm>,
    pub subjects: Vec<SubjectForm>,
    pub groups: Vec<AcademicGroupForm>,
    pub work_step_statuses: Vec<String>,
    pub curators: Vec<CuratorFixture>,
    pub students: Vec<StudentFixture>,
    pub themes: Vec<ThemeFixture>,
    pub works: Vec<WorkFixture>,
    pub suggestions: Vec<SuggestionFixture>,
}

#[derive(Deserialize, Debug)]
pub struct CuratorFixture {
    #[serde(flatten)]
    pub person: Person,
    pub password: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct StudentFixture {
    #[serde(flatten)]
    pub person: Person,
    pub password: Option<String>,
    pub course_number: i16,
    pub group: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Skills, subject, curator and student are referenced by name and username.
#[derive(Deserialize, Debug)]
pub struct ThemeFixture {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub curator: Option<String>,
    pub student: Option<String>,
    pub date_creation: Option<DateTime<Utc>>,
    pub date_acceptance: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct WorkFixture {
    pub theme: String,
    pub date_start: DateTime<Utc>,
    pub date_finish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<StepFixture>,
}

/// `status` is a work step status name; missing ones are created.
#[derive(Deserialize, Debug)]
pub struct StepFixture {
    pub title: String,
    pub description: String,
    pub status: String,
    pub date_start: DateTime<Utc>,
    pub date_finish: DateTime<Utc>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub comments: Vec<CommentForm>,
}

/// Created on the curator's side when a curator is named, else on the
/// student's. New suggestions only take open statuses.
#[derive(Deserialize, Debug)]
pub struct SuggestionFixture {
    pub theme: String,
    pub curator: Option<String>,
    pub student: Option<String>,
    pub status: Option<SuggestionStatus>,
    pub date_creation: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<CommentForm>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub skills: usize,
    pub subjects: usize,
    pub groups: usize,
    pub curators: usize,
    pub students: usize,
    pub themes: usize,
    pub works: usize,
    pub steps: usize,
    pub suggestions: usize,
}

impl Fixtures {
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn find(ids: &HashMap<String, i32>, name: &str, what: &'static str) -> Result<i32, DatabaseError> {
    ids.get(name).copied().ok_or(DatabaseError::NotFound(what))
}

fn find_optional(
    ids: &HashMap<String, i32>,
    name: Option<&str>,
    what: &'static str,
) -> Result<Option<i32>, DatabaseError> {
    name.map(|name| find(ids, name, what)).transpose()
}

fn lookup(
    ids: &HashMap<String, i32>,
    names: &[String],
    what: &'static str,
) -> Result<Vec<i32>, DatabaseError> {
    names.iter().map(|name| find(ids, name, what)).collect()
}

/// The side a seeded suggestion is created on, and the form for it.
fn suggestion_side(
    theme_id: i32,
    curator_id: Option<i32>,
    student_id: Option<i32>,
) -> Result<(Owner, SuggestionForm), DatabaseError> {
    let owner = match (curator_id, student_id) {
        (Some(id), _) => Owner::Curator(id),
        (None, Some(id)) => Owner::Student(id),
        (None, None) => return Err(DatabaseError::NotFound("suggestion curator or student")),
    };
    Ok((
        owner,
        SuggestionForm {
            theme_id,
            student_id,
            curator_id,
            status_id: None,
            date_creation: None,
        },
    ))
}

/// Inserts everything in one transaction, so a broken fixture leaves the
/// database untouched.
pub async fn seed(
    conn: &mut AsyncPgConnection,
    fixtures: &Fixtures,
) -> Result<SeedReport, DatabaseError> {
    let report = conn
        .transaction::<_, DatabaseError, _>(|conn| {
            async move {
                let mut report = SeedReport::default();

                let mut skill_ids = HashMap::new();
                for skill in &fixtures.skills {
                    let created = catalog::create_skill(conn, skill).await?;
                    skill_ids.insert(created.name, created.id);
                    report.skills += 1;
                }

                let mut subject_ids = HashMap::new();
                for subject in &fixtures.subjects {
                    let created = catalog::create_subject(conn, subject).await?;
                    subject_ids.insert(created.name, created.id);
                    report.subjects += 1;
                }

                let mut group_ids = HashMap::new();
                for group in &fixtures.groups {
                    let created = catalog::create_group(conn, group).await?;
                    group_ids.insert(created.name, created.id);
                    report.groups += 1;
                }

                for status in &fixtures.work_step_statuses {
                    catalog::ensure_work_step_status(conn, status).await?;
                }

                let mut curator_ids = HashMap::new();
                for curator in &fixtures.curators {
                    let username = curator.person.username();
                    let password = curator.password.as_deref().unwrap_or(&username);
                    let credentials =
                        create_credentials(conn, &username, password, &[CURATORS_GROUP]).await?;
                    let created =
                        people::create_curator(conn, &curator.person, Some(credentials)).await?;
                    let skills = lookup(&skill_ids, &curator.skills, "skill")?;
                    people::update_curator(conn, created.id, &curator.person, &skills).await?;
                    curator_ids.insert(username, created.id);
                    report.curators += 1;
                }

                let mut student_ids = HashMap::new();
                for student in &fixtures.students {
                    let username = student.person.username();
                    let password = student.password.as_deref().unwrap_or(&username);
                    let credentials =
                        create_credentials(conn, &username, password, &[STUDENTS_GROUP]).await?;
                    let group_id = find_optional(&group_ids, student.group.as_deref(), "group")?;
                    let created = people::create_student(
                        conn,
                        &student.person,
                        student.course_number,
                        group_id,
                        Some(credentials),
                    )
                    .await?;
                    let skills = lookup(&skill_ids, &student.skills, "skill")?;
                    people::update_student(
                        conn,
                        created.id,
                        &student.person,
                        student.course_number,
                        group_id,
                        &skills,
                    )
                    .await?;
                    student_ids.insert(username, created.id);
                    report.students += 1;
                }

                let mut theme_ids = HashMap::new();
                for theme in &fixtures.themes {
                    let skills = lookup(&skill_ids, &theme.skills, "skill")?;
                    let new_theme = NewTheme {
                        curator_id: find_optional(&curator_ids, theme.curator.as_deref(), "curator")?,
                        student_id: find_optional(&student_ids, theme.student.as_deref(), "student")?,
                        changes: ThemeChanges {
                            subject_id: find(&subject_ids, &theme.subject, "subject")?,
                            title: theme.title.clone(),
                            description: theme.description.clone(),
                            date_creation: theme.date_creation.unwrap_or_else(Utc::now),
                            date_acceptance: theme.date_acceptance,
                        },
                    };
                    let created = themes::create_theme(conn, None, new_theme, &skills).await?;
                    theme_ids.insert(created.title, created.id);
                    report.themes += 1;
                }

                for work in &fixtures.works {
                    let form = WorkForm {
                        theme_id: find(&theme_ids, &work.theme, "theme")?,
                        date_start: work.date_start,
                        date_finish: work.date_finish,
                    };
                    let created = works::create_work(conn, None, &form).await?;
                    report.works += 1;
                    for step in &work.steps {
                        let status_id = catalog::ensure_work_step_status(conn, &step.status).await?;
                        let form = WorkStepForm {
                            status_id,
                            title: step.title.clone(),
                            description: step.description.clone(),
                            date_start: step.date_start,
                            date_finish: step.date_finish,
                        };
                        let step_row = works::create_step(conn, None, created.id, form).await?;
                        for content in &step.materials {
                            let material = MaterialForm {
                                content: content.clone(),
                            };
                            works::create_material(conn, None, created.id, step_row.id, &material)
                                .await?;
                        }
                        for comment in &step.comments {
                            works::create_step_comment(
                                conn,
                                None,
                                created.id,
                                step_row.id,
                                comment.clone(),
                            )
                            .await?;
                        }
                        report.steps += 1;
                    }
                }

                for suggestion in &fixtures.suggestions {
                    let (owner, mut form) = suggestion_side(
                        find(&theme_ids, &suggestion.theme, "theme")?,
                        find_optional(&curator_ids, suggestion.curator.as_deref(), "curator")?,
                        find_optional(&student_ids, suggestion.student.as_deref(), "student")?,
                    )?;
                    if let Some(status) = suggestion.status {
                        form.status_id = Some(catalog::suggestion_status_id(conn, status).await?);
                    }
                    form.date_creation = suggestion.date_creation;
                    let created = suggestions::create_suggestion(conn, owner, form).await?;
                    for comment in &suggestion.comments {
                        suggestions::create_comment(conn, owner, created.id, comment.clone())
                            .await?;
                    }
                    report.suggestions += 1;
                }

                Ok(report)
            }
            .scope_boxed()
        })
        .await?;
    info!(?report, "seeded database");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_a_complete_fixture() {
        let fixtures = Fixtures::from_json(
            r#"{
                "skills": [{"name": "Rust", "level": 80}, {"name": "SQL"}],
                "subjects": [{"name": "Databases"}],
                "groups": [{"name": "IU7-12B"}],
                "work_step_statuses": ["planned", "done"],
                "curators": [{
                    "name": "Ivan", "last_name": "Sidorov", "patronymic": "Petrovich",
                    "description": "", "skills": ["Rust"]
                }],
                "students": [{
                    "name": "Anna", "last_name": "Petrova", "patronymic": "Igorevna",
                    "description": "", "course_number": 3, "group": "IU7-12B",
                    "password": "hunter2"
                }],
                "themes": [{
                    "title": "Query planner", "description": "Cost based",
                    "subject": "Databases", "curator": "Ivan.Sidorov.Petrovich",
                    "student": "Anna.Petrova.Igorevna",
                    "date_acceptance": "2024-02-01T10:00:00Z",
                    "skills": ["Rust", "SQL"]
                }],
                "works": [{
                    "theme": "Query planner", "date_start": "2024-02-05T09:00:00Z",
                    "steps": [{
                        "title": "Cardinality estimates", "description": "Histograms",
                        "status": "done",
                        "date_start": "2024-02-05T09:00:00Z",
                        "date_finish": "2024-03-01T18:00:00Z",
                        "materials": ["https://www.postgresql.org/docs/current/planner-stats.html"],
                        "comments": [{"author_name": "Ivan", "content": "Looks good"}]
                    }]
                }],
                "suggestions": [{
                    "theme": "Query planner", "student": "Anna.Petrova.Igorevna",
                    "status": "WAITING_CURATOR",
                    "comments": [{"author_name": "Anna", "content": "Could I take this?"}]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(fixtures.skills[1].level, 0);
        assert_eq!(fixtures.curators[0].person.username(), "Ivan.Sidorov.Petrovich");
        assert_eq!(fixtures.curators[0].password, None);
        assert_eq!(fixtures.students[0].password.as_deref(), Some("hunter2"));
        assert_eq!(fixtures.students[0].group.as_deref(), Some("IU7-12B"));
        assert_eq!(fixtures.themes[0].skills, vec!["Rust", "SQL"]);
        assert_eq!(fixtures.themes[0].student.as_deref(), Some("Anna.Petrova.Igorevna"));

        let step = &fixtures.works[0].steps[0];
        assert_eq!(fixtures.works[0].date_finish, None);
        assert_eq!(step.status, "done");
        assert_eq!(step.materials.len(), 1);
        assert_eq!(step.comments[0].date_creation, None);

        let suggestion = &fixtures.suggestions[0];
        assert_eq!(suggestion.status, Some(SuggestionStatus::WaitingCurator));
        assert_eq!(suggestion.curator, None);
        assert_eq!(suggestion.comments[0].author_name, "Anna");
    }

    #[test]
    fn suggestions_prefer_the_curator_side() {
        let (owner, form) = suggestion_side(3, Some(1), Some(2)).unwrap();
        assert_eq!(owner, Owner::Curator(1));
        assert_eq!((form.theme_id, form.student_id), (3, Some(2)));

        let (owner, form) = suggestion_side(3, None, Some(2)).unwrap();
        assert_eq!(owner, Owner::Student(2));
        assert_eq!(form.curator_id, None);

        assert!(matches!(
            suggestion_side(3, None, None),
            Err(DatabaseError::NotFound(_))
        ));
    }

    #[test]
    fn missing_sections_are_empty() {
        let fixtures = Fixtures::from_json(r#"{"subjects": [{"name": "Math"}]}"#).unwrap();
        assert!(fixtures.skills.is_empty());
        assert!(fixtures.works.is_empty());
        assert!(fixtures.suggestions.is_empty());
        assert_eq!(fixtures.subjects.len(), 1);
    }

    #[test]
    fn unknown_references_are_reported() {
        let ids = HashMap::from([("Rust".to_owned(), 1)]);
        assert_eq!(lookup(&ids, &["Rust".to_owned()], "skill").unwrap(), vec![1]);
        assert_eq!(find_optional(&ids, None, "skill").unwrap(), None);
        assert!(matches!(
            find_optional(&ids, Some("Go"), "skill"),
            Err(DatabaseError::NotFound("skill"))
        ));
        assert!(matches!(
            lookup(&ids, &["Go".to_owned()], "skill"),
            Err(DatabaseError::NotFound("skill"))
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Fixtures::from_json("{\"skills\": 3}"),
            Err(DatabaseError::Fixture(_))
        ));
    }
}
