//! Forward-Auth HTTP Server
//!
//! Serves the filter decision over HTTP so a reverse proxy can ask
//! "may this request pass?" before forwarding it. Every path except
//! `/health` is guarded and answers `200 OK` when allowed.

use crate::adapters::inbound::GeoBlockLayer;
use crate::application::GeoBlockService;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub enabled: bool,
}

/// Forward-auth server.
pub struct HttpServer {
    listen_addr: String,
    service: Arc<GeoBlockService>,
}

impl HttpServer {
    pub fn new(listen_addr: String, service: Arc<GeoBlockService>) -> Self {
        Self {
            listen_addr,
            service,
        }
    }

    /// Build the router. Routes added after the geo layer are not guarded.
    pub fn router(&self) -> Router {
        let enabled = self.service.is_enabled();
        Router::new()
            .fallback(allow_handler)
            .layer(GeoBlockLayer::new(self.service.clone()))
            .route("/health", get(move || health_handler(enabled)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server.
    ///
    /// The final Ok(()) is excluded from coverage since axum::serve runs forever.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = self.router();

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("forward-auth listening on {}", self.listen_addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}

// Handler functions

async fn allow_handler() -> impl IntoResponse {
    StatusCode::OK
}

async fn health_handler(enabled: bool) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        enabled,
    })
}
