//! geoblock - Forward-auth country filter
//!
//! This is the composition root that wires together all the components.

use geoblock::{load_config, GeoBlockService, HttpServer};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting geoblock name={} listen={} enabled={}",
        cfg.name,
        cfg.listen_addr,
        cfg.enabled
    );

    // A filter that fails to build must never receive traffic
    let service = Arc::new(GeoBlockService::from_config(&cfg)?);

    let policy = service.policy();
    tracing::info!(
        allowed = ?policy.allowed_countries(),
        disallowed = ?policy.disallowed_countries(),
        allow_private = policy.allow_private(),
        "country policy loaded"
    );

    let server = HttpServer::new(cfg.listen_addr.clone(), service);

    server.run().await
}
