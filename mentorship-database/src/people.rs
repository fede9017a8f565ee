use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use mentorship_core::person::Person;

use crate::error::{DatabaseError, Found};
use crate::models::{Curator, CuratorChanges, CuratorRow, Skill, Student, StudentChanges, StudentRow};
use crate::schema::{curator_skills, curators, skills, student_skills, students};
use crate::Owner;

/// The login behind a curator or student. `None` if the person is unknown
/// or has no login.
pub async fn owner_credentials(
    conn: &mut AsyncPgConnection,
    owner: Owner,
) -> Result<Option<i32>, DatabaseError> {
    let found: Option<Option<i32>> = match owner {
        Owner::Curator(id) => {
            curators::table
                .find(id)
                .select(curators::credentials_id)
                .first(conn)
                .await
                .optional()?
        }
        Owner::Student(id) => {
            students::table
                .find(id)
                .select(students::credentials_id)
                .first(conn)
                .await
                .optional()?
        }
    };
    Ok(found.flatten())
}

pub async fn list_curators(conn: &mut AsyncPgConnection) -> Result<Vec<Curator>, DatabaseError> {
    let rows = curators::table
        .order(curators::id)
        .select(CuratorRow::as_select())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(Curator::from).collect())
}

pub async fn get_curator(conn: &mut AsyncPgConnection, id: i32) -> Result<Curator, DatabaseError> {
    curators::table
        .find(id)
        .select(CuratorRow::as_select())
        .first(conn)
        .await
        .optional()
        .found("curator")
        .map(Curator::from)
}

pub async fn curator_skills(
    conn: &mut AsyncPgConnection,
    curator_id: i32,
) -> Result<Vec<Skill>, DatabaseError> {
    get_curator(conn, curator_id).await?;
    Ok(curator_skills::table
        .inner_join(skills::table)
        .filter(curator_skills::curator_id.eq(curator_id))
        .order(skills::id)
        .select(Skill::as_select())
        .load(conn)
        .await?)
}

pub async fn create_curator(
    conn: &mut AsyncPgConnection,
    person: &Person,
    credentials_id: Option<i32>,
) -> Result<Curator, DatabaseError> {
    person.validate()?;
    let row = diesel::insert_into(curators::table)
        .values((
            CuratorChanges::from(person),
            curators::credentials_id.eq(credentials_id),
        ))
        .returning(CuratorRow::as_returning())
        .get_result(conn)
        .await?;
    Ok(row.into())
}

/// Replaces the personal data and the whole skill set.
pub async fn update_curator(
    conn: &mut AsyncPgConnection,
    id: i32,
    person: &Person,
    skill_ids: &[i32],
) -> Result<Curator, DatabaseError> {
    person.validate()?;
    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            let row = diesel::update(curators::table.find(id))
                .set(CuratorChanges::from(person))
                .returning(CuratorRow::as_returning())
                .get_result(conn)
                .await
                .optional()
                .found("curator")?;
            diesel::delete(curator_skills::table.filter(curator_skills::curator_id.eq(id)))
                .execute(conn)
                .await?;
            let links: Vec<_> = skill_ids
                .iter()
                .map(|skill_id| {
                    (
                        curator_skills::curator_id.eq(id),
                        curator_skills::skill_id.eq(*skill_id),
                    )
                })
                .collect();
            if !links.is_empty() {
                diesel::insert_into(curator_skills::table)
                    .values(links)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
            }
            Ok(row.into())
        }
        .scope_boxed()
    })
    .await
}

pub async fn list_students(conn: &mut AsyncPgConnection) -> Result<Vec<Student>, DatabaseError> {
    let rows = students::table
        .order(students::id)
        .select(StudentRow::as_select())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(Student::from).collect())
}

pub async fn get_student(conn: &mut AsyncPgConnection, id: i32) -> Result<Student, DatabaseError> {
    students::table
        .find(id)
        .select(StudentRow::as_select())
        .first(conn)
        .await
        .optional()
        .found("student")
        .map(Student::from)
}

pub async fn student_skills(
    conn: &mut AsyncPgConnection,
    student_id: i32,
) -> Result<Vec<Skill>, DatabaseError> {
    get_student(conn, student_id).await?;
    Ok(student_skills::table
        .inner_join(skills::table)
        .filter(student_skills::student_id.eq(student_id))
        .order(skills::id)
        .select(Skill::as_select())
        .load(conn)
        .await?)
}

pub async fn create_student(
    conn: &mut AsyncPgConnection,
    person: &Person,
    course_number: i16,
    group_id: Option<i32>,
    credentials_id: Option<i32>,
) -> Result<Student, DatabaseError> {
    person.validate()?;
    StudentChanges::validate_course(course_number)?;
    let row = diesel::insert_into(students::table)
        .values((
            StudentChanges::new(person, course_number, group_id),
            students::credentials_id.eq(credentials_id),
        ))
        .returning(StudentRow::as_returning())
        .get_result(conn)
        .await?;
    Ok(row.into())
}

pub async fn update_student(
    conn: &mut AsyncPgConnection,
    id: i32,
    person: &Person,
    course_number: i16,
    group_id: Option<i32>,
    skill_ids: &[i32],
) -> Result<Student, DatabaseError> {
    person.validate()?;
    StudentChanges::validate_course(course_number)?;
    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            let row = diesel::update(students::table.find(id))
                .set(StudentChanges::new(person, course_number, group_id))
                .returning(StudentRow::as_returning())
                .get_result(conn)
                .await
                .optional()
                .found("student")?;
            diesel::delete(student_skills::table.filter(student_skills::student_id.eq(id)))
                .execute(conn)
                .await?;
            let links: Vec<_> = skill_ids
                .iter()
                .map(|skill_id| {
                    (
                        student_skills::student_id.eq(id),
                        student_skills::skill_id.eq(*skill_id),
                    )
                })
                .collect();
            if !links.is_empty() {
                diesel::insert_into(student_skills::table)
                    .values(links)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
            }
            Ok(row.into())
        }
        .scope_boxed()
    })
    .await
}
