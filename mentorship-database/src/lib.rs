pub mod auth;
pub mod catalog;
pub mod error;
pub mod models;
pub mod people;
pub mod schema;
pub mod seed;
pub mod suggestions;
pub mod themes;
pub mod works;

use diesel_async::pooled_connection::deadpool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::SimpleAsyncConnection;
pub use diesel::result::Error as DieselError;
pub use diesel_async::AsyncPgConnection;
pub use error::DatabaseError;
use mentorship_core::Party;
use tracing::info;

pub type Pool = deadpool::Pool<AsyncPgConnection>;

const MIGRATION: &str = include_str!("../migrations/2024-01-01-000000_create_tables/up.sql");

// https://github.com/tokio-rs/axum/tree/main/examples/diesel-async-postgres

/// Connections are opened lazily, so this succeeds even if the database is
/// unreachable.
pub fn get_database_connection(database_url: &str) -> Result<Pool, DatabaseError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Ok(Pool::builder(config).build()?)
}

pub fn get_database_connection_from_env() -> Result<Pool, DatabaseError> {
    let database_url = std::env::var("DATABASE_URL")?;
    get_database_connection(&database_url)
}

/// Creates all tables and the fixed lookup rows. Running it again is a no-op.
pub async fn run_migrations(pool: &Pool) -> Result<(), DatabaseError> {
    let mut connection = pool.get().await?;
    connection.batch_execute(MIGRATION).await?;
    info!("database schema is up to date");
    Ok(())
}

/// The curator or student a nested route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Curator(i32),
    Student(i32),
}

impl Owner {
    #[must_use]
    pub const fn party(self) -> Party {
        match self {
            Self::Curator(_) => Party::Curator,
            Self::Student(_) => Party::Student,
        }
    }

    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Curator(id) | Self::Student(id) => id,
        }
    }
}
