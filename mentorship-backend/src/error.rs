use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mentorship_config::ConfigError;
use mentorship_core::DomainError;
use mentorship_database::DatabaseError;
use serde::Serialize;
use tracing::{debug, error};

use crate::extract::Json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("{0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("{0}")]
    PathRejection(#[from] PathRejection),
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("missing or unknown authentication token")]
    Unauthorized,
    #[error("not allowed to access this resource")]
    Forbidden,
    #[error("wrong username or password")]
    BadCredentials,
}

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        Self::Database(value.into())
    }
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for AppError {
    fn from(value: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        Self::Database(value.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(DatabaseError::Domain(DomainError::IncompleteSuggestion { .. })) => {
                StatusCode::CONFLICT
            }
            Self::Database(DatabaseError::Domain(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Database(err) if err.is_constraint_violation() => StatusCode::BAD_REQUEST,
            Self::JsonRejection(rejection) => rejection.status(),
            Self::PathRejection(rejection) => rejection.status(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadCredentials => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Config(_) | Self::File(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mentorship_core::SuggestionStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn domain_errors_are_client_errors() {
        let now = Utc::now();
        let future = AppError::from(DomainError::FutureDate {
            field: "date_start",
            value: now,
        });
        assert_eq!(future.status(), StatusCode::BAD_REQUEST);
        let status = AppError::from(DomainError::InvalidStatus("DONE".to_owned()));
        assert_eq!(status.status(), StatusCode::BAD_REQUEST);
        let initial = AppError::from(DomainError::InitialStatus(SuggestionStatus::AcceptedBoth));
        assert_eq!(initial.status(), StatusCode::BAD_REQUEST);
        let incomplete = AppError::from(DomainError::IncompleteSuggestion {
            suggestion_id: 3,
            missing: "student",
        });
        assert_eq!(incomplete.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_rows_are_not_found() {
        assert_eq!(
            AppError::from(DatabaseError::NotFound("theme")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(DatabaseError::Database(diesel_not_found())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn authentication_failures() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::BadCredentials.status(), StatusCode::NOT_FOUND);
    }

    fn diesel_not_found() -> mentorship_database::DieselError {
        mentorship_database::DieselError::NotFound
    }
}
