//! Skills, subjects, academic groups and the status lookups.

use axum::http::StatusCode;
use mentorship_database::catalog;
use mentorship_database::models::{
    AcademicGroup, AcademicGroupForm, Skill, SkillForm, StatusRow, Subject, SubjectForm,
};

use crate::auth::{Access, Authenticated, Staff};
use crate::error::AppError;
use crate::extract::{DatabaseConnection, Json, Path};
use crate::{ApiRouter, Method};

pub fn routes(router: ApiRouter) -> ApiRouter {
    router
        .route(Method::Get, "/skills", list_skills)
        .route(Method::Post, "/skills", create_skill)
        .route(Method::Get, "/skills/:id", get_skill)
        .route(Method::Put, "/skills/:id", update_skill)
        .route(Method::Delete, "/skills/:id", delete_skill)
        .route(Method::Get, "/subjects", list_subjects)
        .route(Method::Post, "/subjects", create_subject)
        .route(Method::Get, "/subjects/:id", get_subject)
        .route(Method::Put, "/subjects/:id", update_subject)
        .route(Method::Delete, "/subjects/:id", delete_subject)
        .route(Method::Get, "/groups", list_groups)
        .route(Method::Post, "/groups", create_group)
        .route(Method::Get, "/groups/:id", get_group)
        .route(Method::Get, "/suggestion-statuses", suggestion_statuses)
        .route(Method::Get, "/work-step-statuses", work_step_statuses)
}

pub async fn list_skills(
    _access: Access<Staff>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Skill>>, AppError> {
    Ok(Json(catalog::list_skills(&mut conn).await?))
}

pub async fn get_skill(
    _access: Access<Staff>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Skill>, AppError> {
    Ok(Json(catalog::get_skill(&mut conn, id).await?))
}

pub async fn create_skill(
    _access: Access<Staff>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<SkillForm>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    let skill = catalog::create_skill(&mut conn, &form).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    _access: Access<Staff>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<SkillForm>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    let skill = catalog::update_skill(&mut conn, id, &form).await?;
    Ok((StatusCode::ACCEPTED, Json(skill)))
}

pub async fn delete_skill(
    _access: Access<Staff>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<StatusCode, AppError> {
    catalog::delete_skill(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_subjects(
    _access: Access<Staff>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(catalog::list_subjects(&mut conn).await?))
}

pub async fn get_subject(
    _access: Access<Staff>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(catalog::get_subject(&mut conn, id).await?))
}

pub async fn create_subject(
    _access: Access<Staff>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<SubjectForm>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = catalog::create_subject(&mut conn, &form).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn update_subject(
    _access: Access<Staff>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<SubjectForm>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = catalog::update_subject(&mut conn, id, &form).await?;
    Ok((StatusCode::ACCEPTED, Json(subject)))
}

pub async fn delete_subject(
    _access: Access<Staff>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<StatusCode, AppError> {
    catalog::delete_subject(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_groups(
    _user: Authenticated,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<AcademicGroup>>, AppError> {
    Ok(Json(catalog::list_groups(&mut conn).await?))
}

pub async fn get_group(
    _user: Authenticated,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<AcademicGroup>, AppError> {
    Ok(Json(catalog::get_group(&mut conn, id).await?))
}

pub async fn create_group(
    _access: Access<Staff>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<AcademicGroupForm>,
) -> Result<(StatusCode, Json<AcademicGroup>), AppError> {
    let group = catalog::create_group(&mut conn, &form).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn suggestion_statuses(
    _user: Authenticated,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<StatusRow>>, AppError> {
    Ok(Json(catalog::list_suggestion_statuses(&mut conn).await?))
}

pub async fn work_step_statuses(
    _user: Authenticated,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<StatusRow>>, AppError> {
    Ok(Json(catalog::list_work_step_statuses(&mut conn).await?))
}
