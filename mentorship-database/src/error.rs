use std::env::VarError;

use diesel_async::pooled_connection::deadpool;
use mentorship_core::DomainError;
use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database url not set in env variable DATABASE_URL")]
    DatabaseEnvUrl(#[from] VarError),
    #[error("Failed to create database pool {0}")]
    PoolBuild(#[from] deadpool::BuildError),
    #[error("Database pool failed {0}")]
    Pool(#[from] deadpool::PoolError),
    #[error("Database query failed {0}")]
    Database(#[from] diesel::result::Error),
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Password hashing failed {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("Failed to read fixtures {0}")]
    Fixture(#[from] serde_json::Error),
}

impl DatabaseError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Database(diesel::result::Error::NotFound)
        )
    }

    /// Constraint violations caused by the submitted data, like a reference
    /// to a row that does not exist.
    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        use diesel::result::DatabaseErrorKind;
        matches!(
            self,
            Self::Database(diesel::result::Error::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation
                    | DatabaseErrorKind::UniqueViolation
                    | DatabaseErrorKind::CheckViolation
                    | DatabaseErrorKind::NotNullViolation,
                _,
            ))
        )
    }
}

/// Turns a missing row into [`DatabaseError::NotFound`].
pub trait Found<T> {
    fn found(self, what: &'static str) -> Result<T, DatabaseError>;
}

impl<T> Found<T> for Result<Option<T>, diesel::result::Error> {
    fn found(self, what: &'static str) -> Result<T, DatabaseError> {
        self?.ok_or(DatabaseError::NotFound(what))
    }
}
