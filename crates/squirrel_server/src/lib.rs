//! HTTP surface for the squirrel resource.
//!
//! # Responsibility
//! - Map REST verbs on `/squirrels` onto `squirrel_core` service calls.
//! - Own process-level server wiring: config, listener, graceful shutdown.
//!
//! # Invariants
//! - Handlers never hold the database lock across an `.await`.
//! - Client-visible failures are `404 Not Found` with a `text/plain` body.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ServerError};
pub use routes::build_router;
pub use state::AppState;

use log::info;
use squirrel_core::open_db;
use tokio::net::TcpListener;

/// Opens the configured database, binds the listener and serves until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let conn = open_db(&config.db_path)?;
    let listener = TcpListener::bind(config.bind_addr).await?;
    serve(listener, AppState::new(conn)).await
}

/// Serves the router on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!("event=server_start module=server status=ok addr={addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok addr={addr}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("event=server_signal module=server status=error error={err}");
        // Without a signal handler the server keeps running until the process is killed.
        std::future::pending::<()>().await;
    }
}
