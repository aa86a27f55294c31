//! Rule Ranker.
//!
//! Per rule: +10 when its domain equals the detected domain, +5 when its topic
//! is among the detected topics, and +1 for every input token longer than three
//! characters that occurs in the rule's related phrases. Repeated tokens count
//! each time. Rules scoring 0 are dropped; the rest are sorted by score with a
//! stable sort, so equal scores keep catalog order.

use crate::detect::Detection;
use crate::knowledge::{CompiledRule, KnowledgeBase, RuleRecord};
use crate::normalize::MatchMode;

pub const DOMAIN_POINTS: u32 = 10;
pub const TOPIC_POINTS: u32 = 5;
/// Tokens must be strictly longer than this to count.
pub const MIN_TOKEN_CHARS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 3;

pub const CONFIDENCE_HIGH: f32 = 0.9;
pub const CONFIDENCE_MEDIUM: f32 = 0.6;
pub const CONFIDENCE_LOW: f32 = 0.4;

const HIGH_SCORE: u32 = 15;
const MEDIUM_SCORE: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub rule: &'a RuleRecord,
    pub score: u32,
}

#[derive(Debug, Default)]
pub struct Ranking<'a> {
    pub winner: Option<Candidate<'a>>,
    pub confidence: f32,
    pub suggestions: Vec<&'a RuleRecord>,
}

/// Confidence tier for a winning score.
pub fn confidence_for(score: u32) -> f32 {
    if score >= HIGH_SCORE {
        CONFIDENCE_HIGH
    } else if score > MEDIUM_SCORE {
        CONFIDENCE_MEDIUM
    } else if score > 0 {
        CONFIDENCE_LOW
    } else {
        0.0
    }
}

pub(crate) fn score_rule(
    rule: &CompiledRule,
    tokens: &[String],
    detection: &Detection,
    mode: MatchMode,
) -> u32 {
    let mut score = 0;
    if detection.domain.as_deref() == Some(rule.record.domain.as_str()) {
        score += DOMAIN_POINTS;
    }
    if detection.has_topic(&rule.record.topic) {
        score += TOPIC_POINTS;
    }
    score += tokens
        .iter()
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS && mode.contains(&rule.surface, t))
        .count() as u32;
    score
}

/// Score every rule and pick the winner plus up to three runners-up.
///
/// Any positive score clears the lowest tier, so a winner exists whenever at
/// least one rule scored.
pub fn rank<'a>(
    tokens: &[String],
    detection: &Detection,
    kb: &'a KnowledgeBase,
    mode: MatchMode,
) -> Ranking<'a> {
    let mut candidates: Vec<Candidate<'a>> = kb
        .rules
        .iter()
        .map(|r| Candidate {
            rule: &r.record,
            score: score_rule(r, tokens, detection, mode),
        })
        .filter(|c| c.score > 0)
        .collect();

    // stable: ties stay in catalog order
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    let Some(&winner) = candidates.first() else {
        return Ranking::default();
    };

    Ranking {
        winner: Some(winner),
        confidence: confidence_for(winner.score),
        suggestions: candidates
            .iter()
            .skip(1)
            .take(MAX_SUGGESTIONS)
            .map(|c| c.rule)
            .collect(),
    }
}
