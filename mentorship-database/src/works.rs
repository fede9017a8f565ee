//! Works and their steps. Nested routes only see works whose theme belongs
//! to the curator or student in the path.

use chrono::Utc;
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::error::{DatabaseError, Found};
use crate::models::{
    CommentForm, MaterialForm, NewWorkStep, StatusRow, Work, WorkForm, WorkStep, WorkStepComment,
    WorkStepForm, WorkStepMaterial,
};
use crate::schema::{
    themes, work_step_comments, work_step_materials, work_step_statuses, work_steps, works,
};
use crate::{themes as theme_queries, Owner};

type ScopedWorks = IntoBoxed<'static, InnerJoin<works::table, themes::table>, Pg>;

fn scoped(owner: Option<Owner>) -> ScopedWorks {
    let query = works::table.inner_join(themes::table).into_boxed();
    match owner {
        None => query,
        Some(Owner::Curator(id)) => query.filter(themes::curator_id.eq(id)),
        Some(Owner::Student(id)) => query.filter(themes::student_id.eq(id)),
    }
}

pub async fn list_works(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
) -> Result<Vec<Work>, DatabaseError> {
    Ok(scoped(owner)
        .order(works::id)
        .select(Work::as_select())
        .load(conn)
        .await?)
}

pub async fn get_work(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    id: i32,
) -> Result<Work, DatabaseError> {
    scoped(owner)
        .filter(works::id.eq(id))
        .select(Work::as_select())
        .first(conn)
        .await
        .optional()
        .found("work")
}

/// The work's theme has to be visible to `owner` as well.
pub async fn create_work(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    form: &WorkForm,
) -> Result<Work, DatabaseError> {
    form.validate(Utc::now())?;
    theme_queries::get_theme(conn, owner, form.theme_id).await?;
    Ok(diesel::insert_into(works::table)
        .values(form)
        .returning(Work::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn update_work(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    id: i32,
    form: &WorkForm,
) -> Result<Work, DatabaseError> {
    form.validate(Utc::now())?;
    get_work(conn, owner, id).await?;
    theme_queries::get_theme(conn, owner, form.theme_id).await?;
    Ok(diesel::update(works::table.find(id))
        .set(form)
        .returning(Work::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn delete_work(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    id: i32,
) -> Result<(), DatabaseError> {
    get_work(conn, owner, id).await?;
    diesel::delete(works::table.find(id)).execute(conn).await?;
    Ok(())
}

pub async fn list_steps(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
) -> Result<Vec<WorkStep>, DatabaseError> {
    get_work(conn, owner, work_id).await?;
    Ok(work_steps::table
        .filter(work_steps::work_id.eq(work_id))
        .order(work_steps::id)
        .select(WorkStep::as_select())
        .load(conn)
        .await?)
}

pub async fn get_step(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    step_id: i32,
) -> Result<WorkStep, DatabaseError> {
    get_work(conn, owner, work_id).await?;
    work_steps::table
        .filter(work_steps::work_id.eq(work_id))
        .filter(work_steps::id.eq(step_id))
        .select(WorkStep::as_select())
        .first(conn)
        .await
        .optional()
        .found("work step")
}

pub async fn step_status(
    conn: &mut AsyncPgConnection,
    status_id: i32,
) -> Result<StatusRow, DatabaseError> {
    work_step_statuses::table
        .find(status_id)
        .select((work_step_statuses::id, work_step_statuses::name))
        .first(conn)
        .await
        .optional()
        .found("work step status")
}

pub async fn create_step(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    form: WorkStepForm,
) -> Result<WorkStep, DatabaseError> {
    form.validate(Utc::now())?;
    get_work(conn, owner, work_id).await?;
    Ok(diesel::insert_into(work_steps::table)
        .values(NewWorkStep { work_id, form })
        .returning(WorkStep::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn update_step(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    step_id: i32,
    form: &WorkStepForm,
) -> Result<WorkStep, DatabaseError> {
    form.validate(Utc::now())?;
    get_step(conn, owner, work_id, step_id).await?;
    Ok(diesel::update(work_steps::table.find(step_id))
        .set(form)
        .returning(WorkStep::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn delete_step(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    step_id: i32,
) -> Result<(), DatabaseError> {
    get_step(conn, owner, work_id, step_id).await?;
    diesel::delete(work_steps::table.find(step_id))
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list_materials(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    step_id: i32,
) -> Result<Vec<WorkStepMaterial>, DatabaseError> {
    get_step(conn, owner, work_id, step_id).await?;
    Ok(work_step_materials::table
        .filter(work_step_materials::step_id.eq(step_id))
        .order(work_step_materials::id)
        .select(WorkStepMaterial::as_select())
        .load(conn)
        .await?)
}

pub async fn create_material(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    step_id: i32,
    form: &MaterialForm,
) -> Result<WorkStepMaterial, DatabaseError> {
    form.validate()?;
    get_step(conn, owner, work_id, step_id).await?;
    Ok(diesel::insert_into(work_step_materials::table)
        .values((
            work_step_materials::step_id.eq(step_id),
            work_step_materials::content.eq(&form.content),
        ))
        .returning(WorkStepMaterial::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn list_step_comments(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    step_id: i32,
) -> Result<Vec<WorkStepComment>, DatabaseError> {
    get_step(conn, owner, work_id, step_id).await?;
    Ok(work_step_comments::table
        .filter(work_step_comments::work_step_id.eq(step_id))
        .order(work_step_comments::id)
        .select(WorkStepComment::as_select())
        .load(conn)
        .await?)
}

pub async fn create_step_comment(
    conn: &mut AsyncPgConnection,
    owner: Option<Owner>,
    work_id: i32,
    step_id: i32,
    form: CommentForm,
) -> Result<WorkStepComment, DatabaseError> {
    let comment = form.resolve(Utc::now())?;
    get_step(conn, owner, work_id, step_id).await?;
    Ok(diesel::insert_into(work_step_comments::table)
        .values((
            work_step_comments::work_step_id.eq(step_id),
            work_step_comments::author_name.eq(comment.author_name),
            work_step_comments::content.eq(comment.content),
            work_step_comments::date_creation.eq(comment.date_creation),
        ))
        .returning(WorkStepComment::as_returning())
        .get_result(conn)
        .await?)
}
