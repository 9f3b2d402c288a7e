use anyhow::anyhow;
use axum::serve;
use climate_api::{app, build_app_state, get_config_info, get_log_level, setup_logger, Database};
use futures::TryFutureExt;
use log::{error, info};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = get_config_info();
    let log_level = get_log_level(&cli);

    setup_logger()
        .level(log_level)
        .level_for("sqlx", log_level.min(log::LevelFilter::Warn))
        .level_for("climate_api", log_level)
        .level_for("http_response", log_level)
        .level_for("http_request", log_level)
        .apply()?;

    let database_path = cli.database();
    let remote_url = cli.remote_url();
    let host = cli.host();
    let port = cli.port();

    let socket_addr = SocketAddr::from_str(&format!("{}:{}", host, port))
        .map_err(|e| anyhow!("invalid address: {}", e))?;

    let database = Arc::new(
        Database::new(&database_path, cli.max_connections())
            .await
            .map_err(|e| {
                error!("error opening observations database: {:#}", e);
                e
            })?,
    );

    let listener = TcpListener::bind(socket_addr)
        .map_err(|e| anyhow!("error binding to socket: {}", e))
        .await?;

    info!("Climate API starting...");
    info!("  Listen:   http://{}", socket_addr);
    info!("  Docs:     http://{}/docs", socket_addr);
    info!("  Database: {}", database_path);

    let app = app(build_app_state(remote_url, database.clone()));

    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    database.close().await;
    info!("Climate API stopped");

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    res = signal::ctrl_c() => log_ctrl_c_error(res),
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                error!("SIGTERM unavailable, waiting on Ctrl+C only: {}", e);
                log_ctrl_c_error(signal::ctrl_c().await);
            }
        }
    }

    #[cfg(not(unix))]
    log_ctrl_c_error(signal::ctrl_c().await);

    info!("shutdown signal received, draining requests");
}

fn log_ctrl_c_error(res: std::io::Result<()>) {
    if let Err(e) = res {
        error!("Ctrl+C listener failed: {}", e);
    }
}
