use axum::http::StatusCode;
use chrono::Utc;
use mentorship_database::models::{NewTheme, Skill, Theme};
use mentorship_database::themes;
use serde::Deserialize;

use crate::auth::{Access, Scope};
use crate::dto::{ThemeDetail, ThemeIds};
use crate::error::AppError;
use crate::extract::{DatabaseConnection, Json, Path};
use crate::{ApiRouter, Method};

#[derive(Deserialize, Debug)]
pub struct ThemesPath {
    owner: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct ThemePath {
    owner: Option<i32>,
    theme: i32,
}

pub fn routes<S: Scope>(router: ApiRouter, prefix: &str) -> ApiRouter {
    router
        .route(Method::Get, prefix, list_themes::<S>)
        .route(Method::Post, prefix, create_theme::<S>)
        .route(Method::Get, &format!("{prefix}/:theme"), get_theme::<S>)
        .route(Method::Put, &format!("{prefix}/:theme"), update_theme::<S>)
        .route(Method::Delete, &format!("{prefix}/:theme"), delete_theme::<S>)
        .route(Method::Get, &format!("{prefix}/:theme/skills"), theme_skills::<S>)
}

pub async fn list_themes<S: Scope>(
    _access: Access<S>,
    Path(path): Path<ThemesPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Theme>>, AppError> {
    Ok(Json(themes::list_themes(&mut conn, S::owner(path.owner)).await?))
}

pub async fn get_theme<S: Scope>(
    _access: Access<S>,
    Path(path): Path<ThemePath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<ThemeDetail>, AppError> {
    let theme = themes::get_theme(&mut conn, S::owner(path.owner), path.theme).await?;
    let relations = themes::load_relations(&mut conn, theme).await?;
    Ok(Json(relations.into()))
}

/// A theme created below a curator or student is assigned to them.
pub async fn create_theme<S: Scope>(
    _access: Access<S>,
    Path(path): Path<ThemesPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(body): Json<ThemeIds>,
) -> Result<(StatusCode, Json<Theme>), AppError> {
    let theme = NewTheme {
        curator_id: body.curator_id,
        student_id: body.student_id,
        changes: body.changes(Utc::now()),
    };
    let skills = body.skills.unwrap_or_default();
    let created = themes::create_theme(&mut conn, S::owner(path.owner), theme, &skills).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Curator and student stay as they are; only an accepted suggestion
/// reassigns them.
pub async fn update_theme<S: Scope>(
    _access: Access<S>,
    Path(path): Path<ThemePath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(body): Json<ThemeIds>,
) -> Result<(StatusCode, Json<Theme>), AppError> {
    let owner = S::owner(path.owner);
    let current = themes::get_theme(&mut conn, owner, path.theme).await?;
    let changes = body.changes(current.date_creation);
    let updated =
        themes::update_theme(&mut conn, owner, path.theme, &changes, body.skills.as_deref())
            .await?;
    Ok((StatusCode::ACCEPTED, Json(updated)))
}

pub async fn delete_theme<S: Scope>(
    _access: Access<S>,
    Path(path): Path<ThemePath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<StatusCode, AppError> {
    themes::delete_theme(&mut conn, S::owner(path.owner), path.theme).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn theme_skills<S: Scope>(
    _access: Access<S>,
    Path(path): Path<ThemePath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<Skill>>, AppError> {
    themes::get_theme(&mut conn, S::owner(path.owner), path.theme).await?;
    Ok(Json(themes::theme_skills(&mut conn, path.theme).await?))
}
