//! Knowledge Base Store: immutable rule records, scenario records and concept
//! dictionaries, loaded once at startup.
//!
//! Nothing here is mutated after `from_document` returns, so a `KnowledgeBase`
//! can be shared behind an `Arc` by any number of concurrent callers.

pub mod error;
pub mod load;
pub mod model;

use std::collections::HashMap;

pub use error::KnowledgeBaseError;
pub use load::BUILTIN_KNOWLEDGE_BASE;
pub use model::{
    ConceptDictionary, ConceptEntry, GatePolicy, RuleOption, RuleRecord, ScenarioRecord, Verdict,
};

/// A rule plus its precomputed matchable surface.
#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub record: RuleRecord,
    /// Normalized summary + explanation + conditions.
    pub surface: String,
}

/// A scenario plus its normalized triggers.
#[derive(Debug)]
pub(crate) struct CompiledScenario {
    pub record: ScenarioRecord,
    pub keywords: Vec<String>,
    pub phrases: Vec<String>,
}

#[derive(Debug)]
pub struct KnowledgeBase {
    policy: GatePolicy,
    dictionary: ConceptDictionary,
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) scenarios: Vec<CompiledScenario>,
    rule_index: HashMap<String, usize>,
    scenario_index: HashMap<String, usize>,
}

impl KnowledgeBase {
    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    pub fn dictionary(&self) -> &ConceptDictionary {
        &self.dictionary
    }

    /// Rules in catalog order.
    pub fn rules(&self) -> impl Iterator<Item = &RuleRecord> {
        self.rules.iter().map(|r| &r.record)
    }

    /// Scenarios in catalog order.
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.scenarios.iter().map(|s| &s.record)
    }

    pub fn rule(&self, id: &str) -> Option<&RuleRecord> {
        self.rule_index.get(id).map(|&i| &self.rules[i].record)
    }

    pub fn scenario(&self, id: &str) -> Option<&ScenarioRecord> {
        self.scenario_index.get(id).map(|&i| &self.scenarios[i].record)
    }

    /// The derived text surface a rule is scored against.
    pub fn related_phrases(&self, id: &str) -> Option<&str> {
        self.rule_index
            .get(id)
            .map(|&i| self.rules[i].surface.as_str())
    }

    /// Pair every option of `rule` with the record it leads to.
    ///
    /// Targets are validated at load, so every option resolves.
    pub fn resolve_options<'a>(&'a self, rule: &'a RuleRecord) -> Vec<(&'a RuleOption, &'a RuleRecord)> {
        rule.options
            .iter()
            .filter_map(|opt| self.rule(&opt.target_rule_id).map(|target| (opt, target)))
            .collect()
    }

    /// Follow the option labelled `label` (case-insensitive) on rule `rule_id`.
    pub fn follow_option(&self, rule_id: &str, label: &str) -> Option<&RuleRecord> {
        let rule = self.rule(rule_id)?;
        let opt = rule
            .options
            .iter()
            .find(|o| o.label.eq_ignore_ascii_case(label.trim()))?;
        self.rule(&opt.target_rule_id)
    }
}
