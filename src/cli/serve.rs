use std::path::PathBuf;
use crate::cli::commands::ServeArgs;
use crate::config::load_config;
use crate::errors::VulnsnipError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), VulnsnipError> {
    let config_path = args.config.as_ref().map(PathBuf::from);
    let mut config = load_config(config_path.as_deref()).await?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!(host = %config.server.host, port = config.server.port, "Starting API server");

    let state = api::create_app_state(&config).await?;
    let table = state.gate.table();
    if table.is_empty() {
        info!("Debug command endpoint has no allowlisted commands");
    } else {
        info!(
            commands = %table.identifiers().join(","),
            timeout_secs = state.gate.timeout().as_secs(),
            "Debug commands enabled"
        );
    }
    let app = api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| VulnsnipError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
