//! Loads a JSON fixture file into the configured database.
//!
//! Usage: `seed [FILE]`, defaulting to `fixtures/demo.json`.

use mentorship_backend::error::AppError;
use mentorship_backend::setup_tracing;
use mentorship_config::get_config;
use mentorship_database::seed::{seed, Fixtures};
use mentorship_database::{get_database_connection, run_migrations};
use tracing::info;

const DEFAULT_FIXTURES: &str = "fixtures/demo.json";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = get_config()?;
    setup_tracing(&config.log_filter);

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_FIXTURES.to_owned());
    info!(path = %path, "reading fixtures");
    let fixtures = Fixtures::from_json(&std::fs::read_to_string(&path)?)?;

    let pool = get_database_connection(&config.database_url)?;
    run_migrations(&pool).await?;
    let mut conn = pool.get().await?;
    let report = seed(&mut conn, &fixtures).await?;
    info!(
        skills = report.skills,
        subjects = report.subjects,
        groups = report.groups,
        curators = report.curators,
        students = report.students,
        themes = report.themes,
        works = report.works,
        steps = report.steps,
        suggestions = report.suggestions,
        "done"
    );
    Ok(())
}
