//! Skills, subjects, academic groups and the status lookup tables.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use mentorship_core::SuggestionStatus;

use crate::error::{DatabaseError, Found};
use crate::models::{
    AcademicGroup, AcademicGroupForm, Skill, SkillForm, StatusRow, Subject, SubjectForm,
};
use crate::schema::{academic_groups, skills, subjects, suggestion_statuses, work_step_statuses};

pub async fn list_skills(conn: &mut AsyncPgConnection) -> Result<Vec<Skill>, DatabaseError> {
    Ok(skills::table
        .order(skills::id)
        .select(Skill::as_select())
        .load(conn)
        .await?)
}

pub async fn get_skill(conn: &mut AsyncPgConnection, id: i32) -> Result<Skill, DatabaseError> {
    skills::table
        .find(id)
        .select(Skill::as_select())
        .first(conn)
        .await
        .optional()
        .found("skill")
}

pub async fn create_skill(
    conn: &mut AsyncPgConnection,
    form: &SkillForm,
) -> Result<Skill, DatabaseError> {
    form.validate()?;
    Ok(diesel::insert_into(skills::table)
        .values(form)
        .returning(Skill::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn update_skill(
    conn: &mut AsyncPgConnection,
    id: i32,
    form: &SkillForm,
) -> Result<Skill, DatabaseError> {
    form.validate()?;
    diesel::update(skills::table.find(id))
        .set(form)
        .returning(Skill::as_returning())
        .get_result(conn)
        .await
        .optional()
        .found("skill")
}

pub async fn delete_skill(conn: &mut AsyncPgConnection, id: i32) -> Result<(), DatabaseError> {
    let deleted = diesel::delete(skills::table.find(id)).execute(conn).await?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound("skill"));
    }
    Ok(())
}

pub async fn list_subjects(conn: &mut AsyncPgConnection) -> Result<Vec<Subject>, DatabaseError> {
    Ok(subjects::table
        .order(subjects::id)
        .select(Subject::as_select())
        .load(conn)
        .await?)
}

pub async fn get_subject(conn: &mut AsyncPgConnection, id: i32) -> Result<Subject, DatabaseError> {
    subjects::table
        .find(id)
        .select(Subject::as_select())
        .first(conn)
        .await
        .optional()
        .found("subject")
}

pub async fn create_subject(
    conn: &mut AsyncPgConnection,
    form: &SubjectForm,
) -> Result<Subject, DatabaseError> {
    form.validate()?;
    Ok(diesel::insert_into(subjects::table)
        .values(form)
        .returning(Subject::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn update_subject(
    conn: &mut AsyncPgConnection,
    id: i32,
    form: &SubjectForm,
) -> Result<Subject, DatabaseError> {
    form.validate()?;
    diesel::update(subjects::table.find(id))
        .set(form)
        .returning(Subject::as_returning())
        .get_result(conn)
        .await
        .optional()
        .found("subject")
}

pub async fn delete_subject(conn: &mut AsyncPgConnection, id: i32) -> Result<(), DatabaseError> {
    let deleted = diesel::delete(subjects::table.find(id))
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound("subject"));
    }
    Ok(())
}

pub async fn list_groups(
    conn: &mut AsyncPgConnection,
) -> Result<Vec<AcademicGroup>, DatabaseError> {
    Ok(academic_groups::table
        .order(academic_groups::id)
        .select(AcademicGroup::as_select())
        .load(conn)
        .await?)
}

pub async fn get_group(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<AcademicGroup, DatabaseError> {
    academic_groups::table
        .find(id)
        .select(AcademicGroup::as_select())
        .first(conn)
        .await
        .optional()
        .found("group")
}

pub async fn create_group(
    conn: &mut AsyncPgConnection,
    form: &AcademicGroupForm,
) -> Result<AcademicGroup, DatabaseError> {
    form.validate()?;
    Ok(diesel::insert_into(academic_groups::table)
        .values(form)
        .returning(AcademicGroup::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn list_suggestion_statuses(
    conn: &mut AsyncPgConnection,
) -> Result<Vec<StatusRow>, DatabaseError> {
    Ok(suggestion_statuses::table
        .order(suggestion_statuses::id)
        .select((suggestion_statuses::id, suggestion_statuses::name))
        .load(conn)
        .await?)
}

pub async fn suggestion_status_id(
    conn: &mut AsyncPgConnection,
    status: SuggestionStatus,
) -> Result<i32, DatabaseError> {
    suggestion_statuses::table
        .filter(suggestion_statuses::name.eq(status.name()))
        .select(suggestion_statuses::id)
        .first(conn)
        .await
        .optional()
        .found("suggestion status")
}

/// `None` if no status has that id.
pub async fn suggestion_status_name(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<Option<String>, DatabaseError> {
    Ok(suggestion_statuses::table
        .find(id)
        .select(suggestion_statuses::name)
        .first(conn)
        .await
        .optional()?)
}

pub async fn list_work_step_statuses(
    conn: &mut AsyncPgConnection,
) -> Result<Vec<StatusRow>, DatabaseError> {
    Ok(work_step_statuses::table
        .order(work_step_statuses::id)
        .select((work_step_statuses::id, work_step_statuses::name))
        .load(conn)
        .await?)
}

/// Returns the id of the status called `name`, creating it if needed.
pub async fn ensure_work_step_status(
    conn: &mut AsyncPgConnection,
    name: &str,
) -> Result<i32, DatabaseError> {
    diesel::insert_into(work_step_statuses::table)
        .values(work_step_statuses::name.eq(name))
        .on_conflict(work_step_statuses::name)
        .do_nothing()
        .execute(conn)
        .await?;
    Ok(work_step_statuses::table
        .filter(work_step_statuses::name.eq(name))
        .select(work_step_statuses::id)
        .first(conn)
        .await?)
}
