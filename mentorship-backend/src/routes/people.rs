//! `/curators` and `/students` themselves. Their nested resources live in
//! the other route modules.

use axum::http::StatusCode;
use mentorship_database::models::{Curator, Skill, Student};
use mentorship_database::{catalog, people, AsyncPgConnection};

use crate::auth::{Access, CuratorSide, StudentSide};
use crate::dto::{CuratorDetail, CuratorIds, StudentDetail, StudentIds};
use crate::error::AppError;
use crate::extract::{DatabaseConnection, Json, Path};
use crate::{ApiRouter, Method};

pub fn routes(router: ApiRouter) -> ApiRouter {
    router
        .route(Method::Get, "/curators", list_curators)
        .route(Method::Get, "/curators/:owner", get_curator)
        .route(Method::Put, "/curators/:owner", update_curator)
        .route(Method::Get, "/curators/:owner/skills", curator_skills)
        .route(Method::Get, "/students", list_students)
        .route(Method::Get, "/students/:owner", get_student)
        .route(Method::Put, "/students/:owner", update_student)
        .route(Method::Get, "/students/:owner/skills", student_skills)
}

pub async fn list_curators(
    _access: Access<CuratorSide>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Curator>>, AppError> {
    Ok(Json(people::list_curators(&mut conn).await?))
}

pub async fn get_curator(
    _access: Access<CuratorSide>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<CuratorDetail>, AppError> {
    let curator = people::get_curator(&mut conn, id).await?;
    let skills = people::curator_skills(&mut conn, id).await?;
    Ok(Json(CuratorDetail::new(curator, skills)))
}

/// Replaces the personal data and the skill set.
pub async fn update_curator(
    _access: Access<CuratorSide>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(body): Json<CuratorIds>,
) -> Result<(StatusCode, Json<CuratorDetail>), AppError> {
    let curator = people::update_curator(&mut conn, id, &body.person, &body.skills).await?;
    let skills = people::curator_skills(&mut conn, id).await?;
    Ok((StatusCode::ACCEPTED, Json(CuratorDetail::new(curator, skills))))
}

pub async fn curator_skills(
    _access: Access<CuratorSide>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Skill>>, AppError> {
    Ok(Json(people::curator_skills(&mut conn, id).await?))
}

pub async fn list_students(
    _access: Access<StudentSide>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(people::list_students(&mut conn).await?))
}

async fn student_detail(
    conn: &mut AsyncPgConnection,
    student: Student,
) -> Result<StudentDetail, AppError> {
    let group = match student.group_id {
        Some(group_id) => Some(catalog::get_group(conn, group_id).await?),
        None => None,
    };
    let skills = people::student_skills(conn, student.id).await?;
    Ok(StudentDetail::new(student, group, skills))
}

pub async fn get_student(
    _access: Access<StudentSide>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<StudentDetail>, AppError> {
    let student = people::get_student(&mut conn, id).await?;
    Ok(Json(student_detail(&mut conn, student).await?))
}

pub async fn update_student(
    _access: Access<StudentSide>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(body): Json<StudentIds>,
) -> Result<(StatusCode, Json<StudentDetail>), AppError> {
    let student = people::update_student(
        &mut conn,
        id,
        &body.person,
        body.course_number,
        body.group_id,
        &body.skills,
    )
    .await?;
    Ok((StatusCode::ACCEPTED, Json(student_detail(&mut conn, student).await?)))
}

pub async fn student_skills(
    _access: Access<StudentSide>,
    Path(id): Path<i32>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Skill>>, AppError> {
    Ok(Json(people::student_skills(&mut conn, id).await?))
}
