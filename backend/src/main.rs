//! Backend entry-point: loads settings, migrates the database, and serves the
//! REST API with health probes and OpenAPI docs.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use carematch::inbound::http::health::HealthState;
use carematch::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let database_url = settings.database_url().map_err(std::io::Error::other)?;
    let jwt_secret = settings.jwt_secret().map_err(std::io::Error::other)?;
    let token_ttl = settings.token_ttl().map_err(std::io::Error::other)?;

    run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(settings.bind_addr(), pool, jwt_secret, token_ttl);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(bind_addr = %settings.bind_addr(), "carematch listening");
    server.await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("carematch")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}
