//! Situation Classifier — Binary Entrypoint
//! Loads the knowledge base, builds the classifier and serves it over Axum.

use anyhow::Context as _;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use situation_classifier::config::{dev_logging_enabled, ServiceConfig};
use situation_classifier::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - CLASSIFIER_DEV_LOG=1
fn enable_dev_tracing() {
    if !dev_logging_enabled() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("classifier=debug,situation_classifier=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = ServiceConfig::from_env();
    let metrics = Metrics::init()?;

    // A broken knowledge base must stop startup.
    let router = situation_classifier::app(&cfg).context("failed to start classifier")?;

    Ok(router.merge(metrics.router()).into())
}
