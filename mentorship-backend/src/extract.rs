//! Extractors whose rejections render as [`AppError`] JSON bodies.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::async_trait;
use diesel_async::pooled_connection::deadpool::Object;
use mentorship_database::AsyncPgConnection;
use serde::Serialize;

use crate::error::AppError;
use crate::AppState;

#[derive(FromRequest, Debug, Clone)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(FromRequestParts, Debug, Clone)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// A pooled connection held for the duration of the handler.
pub struct DatabaseConnection(pub Object<AsyncPgConnection>);

#[async_trait]
impl FromRequestParts<AppState> for DatabaseConnection {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.pool.get().await?))
    }
}
