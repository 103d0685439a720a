//! Tomato Clock - a pomodoro timer served over HTTP
//!
//! This is the main entry point for the tomato-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use tomato_clock::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::TokioTicker,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tomato_clock={},tower_http=info", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting tomato-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, break={}min, keep_theme={}",
          config.host, config.port, config.work_minutes, config.break_minutes, config.keep_theme);

    // Create application state driven by a tokio tick scheduler
    let state = AppState::new(
        config.host.clone(),
        config.port,
        config.timer_settings()?,
        Arc::new(TokioTicker::new()),
    );

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start        - Start or resume the countdown");
    info!("  POST /pause        - Pause the countdown");
    info!("  POST /reset        - Reset to an idle work phase");
    info!("  POST /theme/toggle - Switch light/dark theme (idle only)");
    info!("  POST /clock/tap    - Announce the current time");
    info!("  GET  /status       - Current timer snapshot and clock");
    info!("  GET  /events       - Server-sent snapshots and notifications");
    info!("  GET  /health       - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
