//! Classification Facade.
//!
//! Fixed pipeline: normalize → detect → scenario (may return) → clarification
//! gate (may return) → rank. Stateless per call: the same input against the
//! same knowledge base always yields the same result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clarify::{clarification_record, needs_clarification};
use crate::detect::detect;
use crate::knowledge::{KnowledgeBase, RuleRecord, ScenarioRecord};
use crate::normalize::{normalize, MatchMode};
use crate::rank::rank;

pub const CONFIDENCE_SCENARIO: f32 = 0.95;
pub const CONFIDENCE_CLARIFICATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Scenario,
    Rule,
    Clarification,
    None,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scenario => "scenario",
            Self::Rule => "rule",
            Self::Clarification => "clarification",
            Self::None => "none",
        }
    }
}

/// Whatever record answered the query. Serialized as the bare record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchedRecord {
    Rule(RuleRecord),
    Scenario(ScenarioRecord),
    Clarification(RuleRecord),
}

impl MatchedRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Rule(r) | Self::Clarification(r) => &r.id,
            Self::Scenario(s) => &s.id,
        }
    }

    /// Domain of the answer; scenarios carry none of their own.
    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::Rule(r) | Self::Clarification(r) => Some(&r.domain),
            Self::Scenario(_) => None,
        }
    }
}

/// The engine's sole output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub confidence: f32,
    pub matched_record: Option<MatchedRecord>,
    pub detected_domain: Option<String>,
    pub detected_topics: Vec<String>,
    pub suggestions: Vec<RuleRecord>,
    pub result_kind: ResultKind,
}

impl ClassificationResult {
    /// "No information": empty input or nothing scored.
    pub fn empty() -> Self {
        Self {
            confidence: 0.0,
            matched_record: None,
            detected_domain: None,
            detected_topics: Vec::new(),
            suggestions: Vec::new(),
            result_kind: ResultKind::None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    kb: Arc<KnowledgeBase>,
    mode: MatchMode,
}

impl Classifier {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            mode: MatchMode::default(),
        }
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    pub fn classify(&self, input: Option<&str>) -> ClassificationResult {
        let raw = input.unwrap_or_default();
        let normalized = normalize(raw);
        if normalized.is_empty() {
            log_outcome(raw, &ClassificationResult::empty());
            return ClassificationResult::empty();
        }

        let text = normalized.text.as_str();
        let detection = detect(text, self.kb.dictionary(), self.mode);

        if let Some(scenario) = crate::scenario::match_scenario(text, &detection, &self.kb, self.mode) {
            let result = ClassificationResult {
                confidence: CONFIDENCE_SCENARIO,
                matched_record: Some(MatchedRecord::Scenario(scenario.clone())),
                detected_domain: detection.domain,
                detected_topics: detection.topics,
                suggestions: Vec::new(),
                result_kind: ResultKind::Scenario,
            };
            log_outcome(raw, &result);
            return result;
        }

        if needs_clarification(&detection, self.kb.policy()) {
            let result = ClassificationResult {
                confidence: CONFIDENCE_CLARIFICATION,
                matched_record: Some(MatchedRecord::Clarification(clarification_record(self.kb.policy()))),
                detected_domain: detection.domain,
                detected_topics: detection.topics,
                suggestions: Vec::new(),
                result_kind: ResultKind::Clarification,
            };
            log_outcome(raw, &result);
            return result;
        }

        let ranking = rank(&normalized.tokens, &detection, &self.kb, self.mode);
        let suggestions = ranking.suggestions.into_iter().cloned().collect();
        let result = match ranking.winner {
            Some(winner) => ClassificationResult {
                confidence: ranking.confidence,
                matched_record: Some(MatchedRecord::Rule(winner.rule.clone())),
                // the winning rule relabels the detected domain
                detected_domain: Some(winner.rule.domain.clone()),
                detected_topics: detection.topics,
                suggestions,
                result_kind: ResultKind::Rule,
            },
            None => ClassificationResult {
                detected_domain: detection.domain,
                detected_topics: detection.topics,
                ..ClassificationResult::empty()
            },
        };
        log_outcome(raw, &result);
        result
    }
}

/// Short stable fingerprint of the input so logs never carry raw text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn log_outcome(raw: &str, result: &ClassificationResult) {
    debug!(
        target: "classifier",
        id = %anon_hash(raw),
        kind = result.result_kind.as_str(),
        confidence = result.confidence,
        matched = result.matched_record.as_ref().map(MatchedRecord::id).unwrap_or("-"),
        domain = result.detected_domain.as_deref().unwrap_or("-"),
        suggestions = result.suggestions.len(),
        "classified"
    );
}
