//! `fundmatch-server` entry point.

use clap::Parser;
use fundmatch_server::{build_router, AppState, Database, ServerConfig, StartupError};
use log::{error, info};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("fundmatch-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    fundmatch_core::init_logging(config.log_level(), config.log_dir.as_deref())
        .map_err(StartupError::Logging)?;

    let conn = config.open_database()?;
    let state = AppState::new(Database::new(conn), config.max_body_bytes);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=server status=ok bind={} database={}",
        listener.local_addr()?,
        config.database
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
