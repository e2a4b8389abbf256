use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::{
    aggregator::Aggregator,
    api,
    config::DashboardConfig,
    location_resolver::LocationResolver,
    upstream::{HttpUpstream, UpstreamSource},
};

/// Full application: routes with their request budget, permissive CORS with credentials
pub fn app(config: &DashboardConfig, upstream: Arc<dyn UpstreamSource>) -> Router {
    let resolver = LocationResolver::new(config.default_location.clone());
    let aggregator = Arc::new(Aggregator::new(upstream, resolver));
    let request_budget = Duration::from_secs(config.server.request_timeout_seconds.into());

    api::router(aggregator, request_budget).layer(CorsLayer::very_permissive())
}

pub async fn run(config: DashboardConfig) -> Result<()> {
    let upstream = HttpUpstream::new(config.providers.clone())?;
    let app = app(&config, Arc::new(upstream));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Dashboard server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
