pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;

use axum::handler::Handler;
use axum::routing::{delete, get, post, put};
use axum::Router;
use error::AppError;
use mentorship_config::Config;
use mentorship_database::{get_database_connection, run_migrations, Pool};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

use crate::auth::{CuratorSide, Staff, StudentSide};

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Default)]
pub struct ApiRouter {
    router: Router<AppState>,
}

impl ApiRouter {
    #[track_caller]
    #[must_use]
    pub fn route<T: 'static, H: Handler<T, AppState>>(
        self,
        method: Method,
        path: &str,
        handler: H,
    ) -> Self {
        Self {
            router: self.router.route(
                path,
                match method {
                    Method::Get => get(handler),
                    Method::Post => post(handler),
                    Method::Put => put(handler),
                    Method::Delete => delete(handler),
                },
            ),
        }
    }

    pub fn finish(self) -> Router<AppState> {
        self.router
    }
}

/// Builds the application. The pool is only used once requests come in.
pub fn setup_server(pool: Pool) -> Router {
    let router = ApiRouter::default();
    let router = routes::auth::routes(router);
    let router = routes::catalog::routes(router);
    let router = routes::people::routes(router);
    let router = routes::themes::routes::<Staff>(router, "/themes");
    let router = routes::themes::routes::<CuratorSide>(router, "/curators/:owner/themes");
    let router = routes::themes::routes::<StudentSide>(router, "/students/:owner/themes");
    let router = routes::works::routes::<Staff>(router, "/works");
    let router = routes::works::routes::<CuratorSide>(router, "/curators/:owner/works");
    let router = routes::works::routes::<StudentSide>(router, "/students/:owner/works");
    let router =
        routes::suggestions::routes::<CuratorSide>(router, "/curators/:owner/suggestions");
    let router =
        routes::suggestions::routes::<StudentSide>(router, "/students/:owner/suggestions");

    router
        .finish()
        .with_state(AppState { pool })
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// `RUST_LOG` wins over the configured filter.
pub fn setup_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        eprintln!("failed to install tracing subscriber: {err}");
    }
}

pub async fn run_server(config: Config) -> Result<(), AppError> {
    info!("starting up server...");

    let pool = get_database_connection(&config.database_url)?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let app = setup_server(pool);
    let listener = TcpListener::bind(config.listen).await?;
    info!(address = %config.listen, "started up server...");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            core::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install signal handler: {err}");
                core::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = core::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    warn!("shutting down");
}
