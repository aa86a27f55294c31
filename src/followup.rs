//! Follow-up enrichment for conversational callers.
//!
//! "What should I do?" on its own matches nothing. When the caller remembers
//! the previous turn's domain (and maybe topic), the cue is prefixed with them
//! so the stateless engine can answer in context.

use serde::Deserialize;

use crate::normalize::normalize_text;

/// Utterances treated as follow-ups, compared after normalization.
pub const FOLLOW_UP_CUES: &[&str] = &[
    "what to do",
    "what should i do",
    "what now",
    "then what",
    "what next",
];

/// What the caller remembers about the last answered turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreviousTurn {
    pub domain: String,
    #[serde(default)]
    pub topic: Option<String>,
}

pub fn is_follow_up(text: &str) -> bool {
    let n = normalize_text(text);
    FOLLOW_UP_CUES.iter().any(|cue| n == *cue)
}

/// Prefix a follow-up cue with the previous domain/topic; anything else is
/// returned unchanged.
pub fn enrich_query(text: &str, previous: Option<&PreviousTurn>) -> String {
    let Some(prev) = previous else {
        return text.to_string();
    };
    if prev.domain.trim().is_empty() || !is_follow_up(text) {
        return text.to_string();
    }

    match prev.topic.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(topic) => format!("{} {} {}", prev.domain, topic, text),
        None => format!("{} {}", prev.domain, text),
    }
}
