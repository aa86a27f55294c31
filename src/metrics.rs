use axum::{routing::get, Router};
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::classify::ResultKind;
use crate::knowledge::KnowledgeBase;

pub const CLASSIFICATIONS_TOTAL: &str = "classifications_total";
pub const KNOWLEDGE_BASE_RULES: &str = "knowledge_base_rules";
pub const KNOWLEDGE_BASE_SCENARIOS: &str = "knowledge_base_scenarios";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        Ok(Self { handle })
    }

    /// `GET /metrics`: classification counters and knowledge base gauges,
    /// rendered for Prometheus scraping.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
    }
}

/// Static gauges describing the loaded knowledge base.
pub fn record_knowledge_base(kb: &KnowledgeBase) {
    gauge!(KNOWLEDGE_BASE_RULES).set(kb.rules().count() as f64);
    gauge!(KNOWLEDGE_BASE_SCENARIOS).set(kb.scenarios().count() as f64);
}

pub fn record_classification(kind: ResultKind) {
    counter!(CLASSIFICATIONS_TOTAL, "kind" => kind.as_str()).increment(1);
}
