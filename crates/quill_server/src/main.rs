#![forbid(unsafe_code)]

use log::{info, warn};
use quill_core::{core_version, init_logging, ArticleService, JsonFileArticleRepository};
use quill_server::{build_router, ServerConfig};
use tokio::net::TcpListener;

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
                return;
            }
            Err(err) => {
                warn!("event=signal_register module=server status=error signal=SIGTERM error={err}");
            }
        }
    }
    let _ = tokio::signal::ctrl_c().await;
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = ServerConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let repo = JsonFileArticleRepository::open(&config.data_file).map_err(|err| err.to_string())?;
    let app = build_router(ArticleService::new(repo));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| format!("failed to bind {}: {err}", config.bind_addr))?;
    info!(
        "event=server_start module=server status=ok addr={} data_file={} version={}",
        config.bind_addr,
        config.data_file.display(),
        core_version()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|err| format!("server error: {err}"))?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}
