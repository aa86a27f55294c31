//! Clarification Gate.
//!
//! An authority-domain hit with no topic is too vague to answer; instead of
//! guessing a rule we hand back one fixed record asking for more detail.

use once_cell::sync::Lazy;

use crate::detect::Detection;
use crate::knowledge::{GatePolicy, RuleRecord, Verdict};

pub const CLARIFICATION_ID: &str = "police_clarify";

static CLARIFICATION: Lazy<RuleRecord> = Lazy::new(|| RuleRecord {
    id: CLARIFICATION_ID.to_string(),
    domain: "Police".to_string(),
    topic: "Clarification".to_string(),
    summary: "Tell me a bit more about what the police asked you to do.".to_string(),
    detailed_explanation: "Your rights depend on the kind of interaction. Describe whether this \
        is a traffic stop, a search of you or your belongings, a request for your phone, or an \
        arrest."
        .to_string(),
    verdict: Verdict::Depends,
    conditions: vec![
        "Were you stopped while driving or riding?".to_string(),
        "Did they want to search you, your bag or your phone?".to_string(),
        "Did they say you are under arrest?".to_string(),
    ],
    options: Vec::new(),
});

/// The fixed "need more detail" record, labelled with the policy's authority
/// domain.
pub fn clarification_record(policy: &GatePolicy) -> RuleRecord {
    RuleRecord {
        domain: policy.authority_domain.clone(),
        ..CLARIFICATION.clone()
    }
}

/// Fires when the authority domain was detected with no topics.
pub fn needs_clarification(detection: &Detection, policy: &GatePolicy) -> bool {
    detection.domain.as_deref() == Some(policy.authority_domain.as_str())
        && detection.topics.is_empty()
}
