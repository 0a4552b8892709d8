//! `squirrel-server` entry point.
//!
//! # Responsibility
//! - Load `ServerConfig` from the environment and `.env`.
//! - Initialize file logging before any database work.
//! - Run the HTTP server until Ctrl-C.

use anyhow::Context;
use log::info;
use squirrel_core::{core_version, init_logging};
use squirrel_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("failed to load server configuration")?;
    init_logging(&config.log_level, &config.log_dir)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    info!(
        "event=cli_start module=cli status=ok version={} bind_addr={} db_path={}",
        core_version(),
        config.bind_addr,
        config.db_path.display()
    );
    println!(
        "squirrel-server {} starting on http://{}",
        core_version(),
        config.bind_addr
    );

    squirrel_server::run(config)
        .await
        .context("squirrel server terminated with an error")?;
    Ok(())
}
