//! Suggestions below a curator or a student. The side of the path decides
//! which party asks for a status change.

use axum::http::StatusCode;
use mentorship_core::ProgressEdit;
use mentorship_database::models::{CommentForm, SuggestionComment};
use mentorship_database::suggestions::{self, StatusRequest, SuggestionForm};
use serde::Deserialize;
use tracing::info;

use crate::auth::{Access, Side};
use crate::dto::{ProgressDetail, StatusChange, SuggestionDetail, SuggestionIds};
use crate::error::AppError;
use crate::extract::{DatabaseConnection, Json, Path};
use crate::{ApiRouter, Method};

#[derive(Deserialize, Debug)]
pub struct SuggestionsPath {
    owner: i32,
}

#[derive(Deserialize, Debug)]
pub struct SuggestionPath {
    owner: i32,
    suggestion: i32,
}

pub fn routes<S: Side>(router: ApiRouter, prefix: &str) -> ApiRouter {
    let suggestion = format!("{prefix}/:suggestion");
    router
        .route(Method::Get, prefix, list_suggestions::<S>)
        .route(Method::Post, prefix, create_suggestion::<S>)
        .route(Method::Get, &suggestion, get_suggestion::<S>)
        .route(Method::Put, &suggestion, change_status::<S>)
        .route(Method::Delete, &suggestion, delete_suggestion::<S>)
        .route(Method::Get, &format!("{suggestion}/comments"), list_comments::<S>)
        .route(Method::Post, &format!("{suggestion}/comments"), create_comment::<S>)
        .route(Method::Get, &format!("{suggestion}/progress"), get_progress::<S>)
        .route(Method::Put, &format!("{suggestion}/progress"), edit_progress::<S>)
}

pub async fn list_suggestions<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionsPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<SuggestionIds>>, AppError> {
    let rows = suggestions::list_suggestions(&mut conn, S::owner_of(path.owner)).await?;
    Ok(Json(rows.into_iter().map(SuggestionIds::from).collect()))
}

pub async fn get_suggestion<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<SuggestionDetail>, AppError> {
    let row = suggestions::get_suggestion(&mut conn, S::owner_of(path.owner), path.suggestion)
        .await?;
    let relations = suggestions::load_relations(&mut conn, row).await?;
    Ok(Json(relations.into()))
}

pub async fn create_suggestion<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionsPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<SuggestionForm>,
) -> Result<(StatusCode, Json<SuggestionIds>), AppError> {
    let row = suggestions::create_suggestion(&mut conn, S::owner_of(path.owner), form).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Runs the negotiation step requested by this side.
pub async fn change_status<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(body): Json<StatusChange>,
) -> Result<(StatusCode, Json<SuggestionIds>), AppError> {
    let owner = S::owner_of(path.owner);
    let request = StatusRequest::try_from(body)?;
    let row = suggestions::change_status(&mut conn, owner, path.suggestion, request).await?;
    info!(
        suggestion = row.id,
        party = %owner.party(),
        status_id = row.status_id,
        "suggestion status changed"
    );
    Ok((StatusCode::ACCEPTED, Json(row.into())))
}

pub async fn delete_suggestion<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<StatusCode, AppError> {
    suggestions::delete_suggestion(&mut conn, S::owner_of(path.owner), path.suggestion).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<Vec<SuggestionComment>>, AppError> {
    Ok(Json(
        suggestions::list_comments(&mut conn, S::owner_of(path.owner), path.suggestion).await?,
    ))
}

pub async fn create_comment<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(form): Json<CommentForm>,
) -> Result<(StatusCode, Json<SuggestionComment>), AppError> {
    let comment =
        suggestions::create_comment(&mut conn, S::owner_of(path.owner), path.suggestion, form)
            .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_progress<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<Json<ProgressDetail>, AppError> {
    let progress =
        suggestions::get_progress(&mut conn, S::owner_of(path.owner), path.suggestion).await?;
    Ok(Json(progress.into()))
}

pub async fn edit_progress<S: Side>(
    _access: Access<S>,
    Path(path): Path<SuggestionPath>,
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(edit): Json<ProgressEdit>,
) -> Result<(StatusCode, Json<ProgressDetail>), AppError> {
    let progress =
        suggestions::edit_progress(&mut conn, S::owner_of(path.owner), path.suggestion, edit)
            .await?;
    Ok((StatusCode::ACCEPTED, Json(progress.into())))
}
