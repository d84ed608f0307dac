//! Haiti Dashboard HTTP Server Binary
//!
//! Loads the configured dataset once, then serves the dashboard API.
//!
//! # Usage
//!
//! ```bash
//! DASHBOARD_DATA_PATH=data/data_op_pres.csv cargo run --bin haiti-dash-server
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_CONFIG`: config file (default: search for `dashboard.toml`)
//! - `DASHBOARD_DATA_PATH`, `DASHBOARD_DATA_FORMAT`: data file overrides
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use haiti_dash::config::DashboardConfig;
use haiti_dash::http::{create_router, AppState};
use haiti_dash::io::global_cache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Haiti dashboard server");

    let config = DashboardConfig::load()?;
    let source = config.data_source()?;

    // A load failure leaves the server up in a "no data" state.
    let state = AppState::from_source(&source, global_cache());
    if !state.is_available() {
        warn!("Serving without data; check the data file and restart");
    }

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
