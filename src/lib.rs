// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod knowledge;
pub mod normalize;

// Classification pipeline stages, in call order
pub mod detect;
pub mod scenario;
pub mod clarify;
pub mod rank;
pub mod classify;

// Service glue
pub mod api;
pub mod config;
pub mod followup;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::classify::{ClassificationResult, Classifier, MatchedRecord, ResultKind};
pub use crate::knowledge::{KnowledgeBase, KnowledgeBaseError, RuleRecord, ScenarioRecord, Verdict};
pub use crate::normalize::MatchMode;

use std::sync::Arc;

/// Build the full router from a loaded configuration: knowledge base,
/// classifier and HTTP routes. Metrics are wired separately by the caller.
pub fn app(cfg: &config::ServiceConfig) -> anyhow::Result<axum::Router> {
    let kb = Arc::new(cfg.load_knowledge_base()?);
    metrics::record_knowledge_base(&kb);
    let classifier = Classifier::new(kb).with_match_mode(cfg.match_mode);
    tracing::info!(
        match_mode = cfg.match_mode.as_str(),
        "classifier ready"
    );
    Ok(api::router(api::AppState::new(classifier)))
}
