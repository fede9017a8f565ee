use axum::http::StatusCode;
use mentorship_database::auth::{self, LoginToken};

use crate::auth::Token;
use crate::dto::LoginRequest;
use crate::error::AppError;
use crate::extract::{DatabaseConnection, Json};
use crate::{ApiRouter, Method};

pub fn routes(router: ApiRouter) -> ApiRouter {
    router
        .route(Method::Post, "/login", login)
        .route(Method::Post, "/logout", logout)
}

pub async fn login(
    DatabaseConnection(mut conn): DatabaseConnection,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginToken>, AppError> {
    auth::login(&mut conn, &request.username, &request.password)
        .await?
        .map(Json)
        .ok_or(AppError::BadCredentials)
}

pub async fn logout(
    Token(token): Token,
    DatabaseConnection(mut conn): DatabaseConnection,
) -> Result<StatusCode, AppError> {
    if auth::logout(&mut conn, &token).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Unauthorized)
    }
}
