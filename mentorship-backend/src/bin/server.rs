use mentorship_backend::error::AppError;
use mentorship_backend::{run_server, setup_tracing};
use mentorship_config::get_config;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = get_config()?;
    setup_tracing(&config.log_filter);
    run_server(config).await
}
