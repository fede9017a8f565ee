use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::error::{DatabaseError, Found};
use crate::models::{Curator, NewTheme, Skill, Student, Subject, Theme, ThemeChanges};
use crate::schema::{skills, theme_skills, themes};
use crate::{catalog, people, Owner};

/// A theme together with everything it references.
#[derive(Debug, Clone)]
pub struct ThemeRelations {
    pub theme: Theme,
    pub subject: Subject,
    pub curator: Option<Curator>,
    pub student: Option<Student>,
    pub skills: Vec<Skill>,
}

fn scoped(owner: Option<Owner>) -> themes::BoxedQuery<'static, Pg> {
    let query = themes::table.into_boxed();
    match owner {
        None => query,
        Some(Owner::Curator(id)) => query.filter(themes::curator_id.eq(id)),
        Some(Owner::Student(id)) => query.filter(themes::student_id.eq(id)),
    }
}

pub async fn list_themes(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
) -> Result<Vec<Theme>, DatabaseError> {
    Ok(scoped(owner)
        .order(themes::id)
        .select(Theme::as_select())
        .load(conn)
        .await?)
}

pub async fn get_theme(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    id: i32,
) -> Result<Theme, DatabaseError> {
    scoped(owner)
        .filter(themes::id.eq(id))
        .select(Theme::as_select())
        .first(conn)
        .await
        .optional()
        .found("theme")
}

pub async fn theme_skills(
    conn: &mut AsyncPgConnection,
    theme_id: i32,
) -> Result<Vec<Skill>, DatabaseError> {
    Ok(theme_skills::table
        .inner_join(skills::table)
        .filter(theme_skills::theme_id.eq(theme_id))
        .order(skills::id)
        .select(Skill::as_select())
        .load(conn)
        .await?)
}

pub async fn load_relations(
    conn: &mut AsyncPgConnection,
    theme: Theme,
) -> Result<ThemeRelations, DatabaseError> {
    let subject = catalog::get_subject(conn, theme.subject_id).await?;
    let curator = match theme.curator_id {
        Some(id) => Some(people::get_curator(conn, id).await?),
        None => None,
    };
    let student = match theme.student_id {
        Some(id) => Some(people::get_student(conn, id).await?),
        None => None,
    };
    let skills = theme_skills(conn, theme.id).await?;
    Ok(ThemeRelations {
        theme,
        subject,
        curator,
        student,
        skills,
    })
}

async fn replace_skills(
    conn: &mut AsyncPgConnection,
    theme_id: i32,
    skill_ids: &[i32],
) -> Result<(), DatabaseError> {
    diesel::delete(theme_skills::table.filter(theme_skills::theme_id.eq(theme_id)))
        .execute(conn)
        .await?;
    if skill_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<_> = skill_ids
        .iter()
        .map(|skill_id| {
            (
                theme_skills::theme_id.eq(theme_id),
                theme_skills::skill_id.eq(*skill_id),
            )
        })
        .collect();
    diesel::insert_into(theme_skills::table)
        .values(links)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

/// Creating a theme under a curator or student assigns it to them.
pub async fn create_theme(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    mut theme: NewTheme,
    skill_ids: &[i32],
) -> Result<Theme, DatabaseError> {
    theme.changes.validate(Utc::now())?;
    match owner {
        Some(Owner::Curator(id)) => theme.curator_id = Some(id),
        Some(Owner::Student(id)) => theme.student_id = Some(id),
        None => {}
    }
    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            let created = diesel::insert_into(themes::table)
                .values(theme)
                .returning(Theme::as_returning())
                .get_result(conn)
                .await?;
            replace_skills(conn, created.id, skill_ids).await?;
            Ok(created)
        }
        .scope_boxed()
    })
    .await
}

/// `skill_ids` of `None` keeps the current skills.
pub async fn update_theme(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    id: i32,
    changes: &ThemeChanges,
    skill_ids: Option<&[i32]>,
) -> Result<Theme, DatabaseError> {
    changes.validate(Utc::now())?;
    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            get_theme(conn, owner, id).await?;
            let updated = diesel::update(themes::table.find(id))
                .set(changes)
                .returning(Theme::as_returning())
                .get_result(conn)
                .await?;
            if let Some(skill_ids) = skill_ids {
                replace_skills(conn, id, skill_ids).await?;
            }
            Ok(updated)
        }
        .scope_boxed()
    })
    .await
}

pub async fn delete_theme(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    id: i32,
) -> Result<(), DatabaseError> {
    get_theme(conn, owner, id).await?;
    diesel::delete(themes::table.find(id)).execute(conn).await?;
    Ok(())
}
