//! Works, their steps, and the steps' materials and comments.

use axum::http::StatusCode;
use mentorship_database::models::{
    CommentForm, MaterialForm, Work, WorkForm, WorkStep, WorkStepComment, WorkStepForm,
    WorkStepMaterial,
};
use mentorship_database::{themes, works};
use serde::Deserialize;

use crate::auth::{Access, Scope};
use crate::dto::{WorkDetail, WorkStepDetail};
use crate::error::AppError;
use crate::extract::{DatabaseConnection, Json, Path};
use crate::{ApiRouter, Method};

#[derive(Deserialize, Debug)]
pub struct WorksPath {
    owner: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct WorkPath {
    owner: Option<i32>,
    work: i32,
}

#[derive(Deserialize, Debug)]
pub struct StepPath {
    owner: Option<i32>,
    work: i32,
    step: i32,
}

pub fn routes<S: Scope>(router: ApiRouter, prefix: &str) -> ApiRouter {
    let work = format!("{prefix}/:work");
    let steps = format!("{work}/steps");
    let step = format!("{steps}/:step");
    router
        .route(Method::Get, prefix, list_works::<S>)
        .route(Method::Post, prefix, create_work::<S>)
        .route(Method::Get, &work, get_work::<S>)
        .route(Method::Put, &work, update_work::<S>)
        .route(Method::Delete, &work, delete_work::<S>)
        .route(Method::Get, &steps, list_steps::<S>)
        .route(Method::Post, &steps, create_step::<S>)
        .route(Method::Get, &step, get_step::<S>)
        .route(Method::Put, &step, update_step::<S>)
        .route(Method::Delete, &step, delete_step::<S>)
        .route(Method::Get, &format!("{step}/materials"), list_materials::<S>)
        .route(Method::Post, &format!("{step}/materials"), create_material::<S>)
        .route(Method::Get, &format!("{step}/comments"), list_comments::<S>)
        .route(Method::Post, &format!("{step}/comments"), create_comment::<S>)
}

pub async fn list_works<S: Scope>(
    _access: Access<S>,
    Path(path): Path<WorksPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Work>>, AppError> {
    Ok(Json(works::list_works(&mut conn, S::owner(path.owner)).await?))
}

pub async fn get_work<S: Scope>(
    _access: Access<S>,
    Path(path): Path<WorkPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<WorkDetail>, AppError> {
    let owner = S::owner(path.owner);
    let work = works::get_work(&mut conn, owner, path.work).await?;
    let theme = themes::get_theme(&mut conn, None, work.theme_id).await?;
    let steps = works::list_steps(&mut conn, owner, path.work).await?;
    Ok(Json(WorkDetail::new(work, theme, steps)))
}

pub async fn create_work<S: Scope>(
    _access: Access<S>,
    Path(path): Path<WorksPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<WorkForm>,
) -> Result<(StatusCode, Json<Work>), AppError> {
    let work = works::create_work(&mut conn, S::owner(path.owner), &form).await?;
    Ok((StatusCode::CREATED, Json(work)))
}

pub async fn update_work<S: Scope>(
    _access: Access<S>,
    Path(path): Path<WorkPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<WorkForm>,
) -> Result<(StatusCode, Json<Work>), AppError> {
    let work = works::update_work(&mut conn, S::owner(path.owner), path.work, &form).await?;
    Ok((StatusCode::ACCEPTED, Json(work)))
}

pub async fn delete_work<S: Scope>(
    _access: Access<S>,
    Path(path): Path<WorkPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<StatusCode, AppError> {
    works::delete_work(&mut conn, S::owner(path.owner), path.work).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_steps<S: Scope>(
    _access: Access<S>,
    Path(path): Path<WorkPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<WorkStep>>, AppError> {
    Ok(Json(
        works::list_steps(&mut conn, S::owner(path.owner), path.work).await?,
    ))
}

pub async fn get_step<S: Scope>(
    _access: Access<S>,
    Path(path): Path<StepPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<WorkStepDetail>, AppError> {
    let owner = S::owner(path.owner);
    let step = works::get_step(&mut conn, owner, path.work, path.step).await?;
    let status = works::step_status(&mut conn, step.status_id).await?;
    let materials = works::list_materials(&mut conn, owner, path.work, path.step).await?;
    Ok(Json(WorkStepDetail::new(step, status, materials)))
}

pub async fn create_step<S: Scope>(
    _access: Access<S>,
    Path(path): Path<WorkPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<WorkStepForm>,
) -> Result<(StatusCode, Json<WorkStep>), AppError> {
    let step = works::create_step(&mut conn, S::owner(path.owner), path.work, form).await?;
    Ok((StatusCode::CREATED, Json(step)))
}

pub async fn update_step<S: Scope>(
    _access: Access<S>,
    Path(path): Path<StepPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<WorkStepForm>,
) -> Result<(StatusCode, Json<WorkStep>), AppError> {
    let step =
        works::update_step(&mut conn, S::owner(path.owner), path.work, path.step, &form).await?;
    Ok((StatusCode::ACCEPTED, Json(step)))
}

pub async fn delete_step<S: Scope>(
    _access: Access<S>,
    Path(path): Path<StepPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<StatusCode, AppError> {
    works::delete_step(&mut conn, S::owner(path.owner), path.work, path.step).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_materials<S: Scope>(
    _access: Access<S>,
    Path(path): Path<StepPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<WorkStepMaterial>>, AppError> {
    Ok(Json(
        works::list_materials(&mut conn, S::owner(path.owner), path.work, path.step).await?,
    ))
}

pub async fn create_material<S: Scope>(
    _access: Access<S>,
    Path(path): Path<StepPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<MaterialForm>,
) -> Result<(StatusCode, Json<WorkStepMaterial>), AppError> {
    let material =
        works::create_material(&mut conn, S::owner(path.owner), path.work, path.step, &form)
            .await?;
    Ok((StatusCode::CREATED, Json(material)))
}

pub async fn list_comments<S: Scope>(
    _access: Access<S>,
    Path(path): Path<StepPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<WorkStepComment>>, AppError> {
    Ok(Json(
        works::list_step_comments(&mut conn, S::owner(path.owner), path.work, path.step).await?,
    ))
}

pub async fn create_comment<S: Scope>(
    _access: Access<S>,
    Path(path): Path<StepPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<CommentForm>,
) -> Result<(StatusCode, Json<WorkStepComment>), AppError> {
    let comment =
        works::create_step_comment(&mut conn, S::owner(path.owner), path.work, path.step, form)
            .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
