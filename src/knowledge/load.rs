//! Knowledge base loading: TOML → normalized triggers → integrity checks.
//!
//! Every trigger is run through the text normalizer so it compares against
//! normalized input. Integrity failures are returned as `KnowledgeBaseError`
//! and are meant to abort startup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::error::KnowledgeBaseError;
use super::model::{ConceptDictionary, ConceptEntry, KnowledgeDocument, RuleRecord};
use super::{CompiledRule, CompiledScenario, KnowledgeBase};
use crate::normalize::normalize_text;

/// Knowledge base compiled into the binary; used when no path is configured.
pub const BUILTIN_KNOWLEDGE_BASE: &str = include_str!("../../config/knowledge.toml");

impl KnowledgeBase {
    /// Parse and validate the bundled knowledge base.
    pub fn builtin() -> Result<Self, KnowledgeBaseError> {
        Self::from_toml_str(BUILTIN_KNOWLEDGE_BASE)
    }

    pub fn from_path(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let content = fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, KnowledgeBaseError> {
        let doc: KnowledgeDocument = toml::from_str(toml_str)?;
        Self::from_document(doc)
    }

    fn from_document(doc: KnowledgeDocument) -> Result<Self, KnowledgeBaseError> {
        let mut policy = doc.policy;
        policy.gate_literals = normalize_triggers("policy.gate_literals", &policy.gate_literals)?;

        let dictionary = ConceptDictionary {
            domains: normalize_entries("domain", doc.domains)?,
            topics: normalize_entries("topic", doc.topics)?,
        };

        let mut rule_index = HashMap::with_capacity(doc.rules.len());
        for (i, rule) in doc.rules.iter().enumerate() {
            if rule_index.insert(rule.id.clone(), i).is_some() {
                return Err(KnowledgeBaseError::DuplicateRuleId(rule.id.clone()));
            }
        }

        check_options(&doc.rules, &rule_index)?;
        if let Some(cycle) = find_option_cycle(&doc.rules, &rule_index) {
            return Err(KnowledgeBaseError::OptionCycle(cycle));
        }

        for domain in &dictionary.domains {
            if !doc.rules.iter().any(|r| r.domain == domain.name) {
                return Err(KnowledgeBaseError::OrphanDomain(domain.name.clone()));
            }
        }

        let mut scenario_index = HashMap::with_capacity(doc.scenarios.len());
        let mut scenarios = Vec::with_capacity(doc.scenarios.len());
        for (i, record) in doc.scenarios.into_iter().enumerate() {
            if scenario_index.insert(record.id.clone(), i).is_some() {
                return Err(KnowledgeBaseError::DuplicateScenarioId(record.id));
            }
            let owner = format!("scenario `{}`", record.id);
            let keywords = normalize_triggers(&owner, &record.keywords)?;
            let phrases = normalize_triggers(&owner, &record.said_phrases)?;
            if keywords.is_empty() && phrases.is_empty() {
                warn!(scenario = %record.id, "scenario has no keywords or phrases and can never match");
            }
            scenarios.push(CompiledScenario {
                record,
                keywords,
                phrases,
            });
        }

        let rules: Vec<CompiledRule> = doc
            .rules
            .into_iter()
            .map(|record| {
                let surface = normalize_text(&record.related_text());
                CompiledRule { record, surface }
            })
            .collect();

        info!(
            rules = rules.len(),
            scenarios = scenarios.len(),
            domains = dictionary.domains.len(),
            topics = dictionary.topics.len(),
            "knowledge base loaded"
        );

        Ok(Self {
            policy,
            dictionary,
            rules,
            scenarios,
            rule_index,
            scenario_index,
        })
    }
}

fn normalize_entries(
    kind: &str,
    entries: Vec<ConceptEntry>,
) -> Result<Vec<ConceptEntry>, KnowledgeBaseError> {
    entries
        .into_iter()
        .map(|e| {
            let owner = format!("{kind} `{}`", e.name);
            let terms = normalize_triggers(&owner, &e.terms)?;
            Ok(ConceptEntry {
                name: e.name,
                terms,
            })
        })
        .collect()
}

fn normalize_triggers(owner: &str, raw: &[String]) -> Result<Vec<String>, KnowledgeBaseError> {
    raw.iter()
        .map(|t| {
            let n = normalize_text(t);
            if n.is_empty() {
                Err(KnowledgeBaseError::EmptyTrigger {
                    owner: owner.to_string(),
                })
            } else {
                Ok(n)
            }
        })
        .collect()
}

fn check_options(
    rules: &[RuleRecord],
    index: &HashMap<String, usize>,
) -> Result<(), KnowledgeBaseError> {
    for rule in rules {
        for opt in &rule.options {
            if opt.target_rule_id == rule.id {
                return Err(KnowledgeBaseError::SelfReference(rule.id.clone()));
            }
            if !index.contains_key(&opt.target_rule_id) {
                return Err(KnowledgeBaseError::DanglingOption {
                    rule_id: rule.id.clone(),
                    label: opt.label.clone(),
                    target: opt.target_rule_id.clone(),
                });
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search over option edges. Returns the ids along the first
/// cycle found (closing id repeated at the end), scanning rules in catalog order.
fn find_option_cycle(rules: &[RuleRecord], index: &HashMap<String, usize>) -> Option<Vec<String>> {
    let mut marks = vec![Mark::Unvisited; rules.len()];
    let mut path = Vec::new();
    for start in 0..rules.len() {
        if marks[start] == Mark::Unvisited {
            if let Some(cycle) = visit(start, rules, index, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn visit(
    i: usize,
    rules: &[RuleRecord],
    index: &HashMap<String, usize>,
    marks: &mut [Mark],
    path: &mut Vec<usize>,
) -> Option<Vec<String>> {
    marks[i] = Mark::InProgress;
    path.push(i);

    for opt in &rules[i].options {
        let Some(&j) = index.get(&opt.target_rule_id) else {
            continue;
        };
        match marks[j] {
            Mark::InProgress => {
                let from = path.iter().position(|&p| p == j).unwrap_or(0);
                let mut cycle: Vec<String> = path[from..].iter().map(|&p| rules[p].id.clone()).collect();
                cycle.push(rules[j].id.clone());
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(j, rules, index, marks, path) {
                    return Some(cycle);
                }
            }
            Mark::Done => {}
        }
    }

    path.pop();
    marks[i] = Mark::Done;
    None
}
