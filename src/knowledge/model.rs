//! Record types of the knowledge base.
//!
//! The TOML document deserializes straight into these; the same types are
//! serialized back out in classification results, so field names are the wire
//! names as well.

use serde::{Deserialize, Serialize};

/// Closed set of answers a record can give.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Can,
    Cannot,
    Depends,
    MustStop,
    MustShow,
}

/// A disambiguation branch: picking `label` leads to `target_rule_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOption {
    pub label: String,
    pub target_rule_id: String,
}

/// A single legal/administrative statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub id: String,
    pub domain: String,
    pub topic: String,
    pub summary: String,
    pub detailed_explanation: String,
    pub verdict: Verdict,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<RuleOption>,
}

impl RuleRecord {
    /// Raw text surface used for lexical overlap (before normalization).
    pub fn related_text(&self) -> String {
        let mut parts = Vec::with_capacity(2 + self.conditions.len());
        parts.push(self.summary.as_str());
        parts.push(self.detailed_explanation.as_str());
        parts.extend(self.conditions.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// High-priority record for a stock authority phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: String,
    pub title: String,
    /// Trigger substrings; only honoured once the traffic topic was detected.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// What the authority says; any one contained in the input is a match.
    #[serde(default)]
    pub said_phrases: Vec<String>,
    pub summary: String,
    pub detailed_explanation: String,
    pub verdict: Verdict,
    #[serde(default)]
    pub conditions: Vec<String>,
}

/// One named dictionary entry (a domain or a topic) with its triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptEntry {
    pub name: String,
    pub terms: Vec<String>,
}

/// Domain and topic triggers, kept in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptDictionary {
    pub domains: Vec<ConceptEntry>,
    pub topics: Vec<ConceptEntry>,
}

/// Names the scenario gate and clarification gate key on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePolicy {
    #[serde(default = "default_authority_domain")]
    pub authority_domain: String,
    #[serde(default = "default_traffic_topic")]
    pub traffic_topic: String,
    /// Literal substrings that open the scenario gate on their own.
    #[serde(default = "default_gate_literals")]
    pub gate_literals: Vec<String>,
}

fn default_authority_domain() -> String {
    "Police".to_string()
}

fn default_traffic_topic() -> String {
    "Traffic".to_string()
}

fn default_gate_literals() -> Vec<String> {
    vec!["traffic".to_string(), "police".to_string()]
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            authority_domain: default_authority_domain(),
            traffic_topic: default_traffic_topic(),
            gate_literals: default_gate_literals(),
        }
    }
}

/// On-disk shape of the whole knowledge base.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KnowledgeDocument {
    #[serde(default)]
    pub policy: GatePolicy,
    #[serde(default)]
    pub domains: Vec<ConceptEntry>,
    #[serde(default)]
    pub topics: Vec<ConceptEntry>,
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioRecord>,
}
