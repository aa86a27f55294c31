use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::classify::{ClassificationResult, Classifier};
use crate::followup::{enrich_query, PreviousTurn};
use crate::knowledge::{RuleRecord, ScenarioRecord};
use crate::metrics::record_classification;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
}

impl AppState {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/classify", post(classify))
        .route("/rules/{id}", get(get_rule))
        .route("/scenarios/{id}", get(get_scenario))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, serde::Deserialize)]
struct ClassifyReq {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    previous: Option<PreviousTurn>,
}

async fn classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyReq>,
) -> Json<ClassificationResult> {
    let query = body
        .text
        .as_deref()
        .map(|t| enrich_query(t, body.previous.as_ref()));
    let result = state.classifier.classify(query.as_deref());
    record_classification(result.result_kind);
    Json(result)
}

#[derive(serde::Serialize)]
struct ResolvedOption<'a> {
    label: &'a str,
    target: &'a RuleRecord,
}

#[derive(serde::Serialize)]
struct RuleOut<'a> {
    #[serde(flatten)]
    rule: &'a RuleRecord,
    resolved_options: Vec<ResolvedOption<'a>>,
}

async fn get_rule(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let kb = state.classifier.knowledge_base();
    let Some(rule) = kb.rule(&id) else {
        return not_found("rule", &id);
    };
    let resolved_options = kb
        .resolve_options(rule)
        .into_iter()
        .map(|(opt, target)| ResolvedOption {
            label: &opt.label,
            target,
        })
        .collect();
    Json(RuleOut {
        rule,
        resolved_options,
    })
    .into_response()
}

async fn get_scenario(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.classifier.knowledge_base().scenario(&id) {
        Some(s) => Json::<&ScenarioRecord>(s).into_response(),
        None => not_found("scenario", &id),
    }
}

fn not_found(what: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("unknown {what} `{id}`") })),
    )
        .into_response()
}
