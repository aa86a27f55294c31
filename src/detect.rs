//! Domain/Topic detection against the concept dictionaries.
//!
//! Domains are scored (2 points per trigger contained in the text) and the first
//! domain to reach the maximum wins; later domains with an equal score do not
//! replace it. Topics are unscored: every topic with at least one trigger hit
//! is reported once, in declared order.

use serde::Serialize;

use crate::knowledge::ConceptDictionary;
use crate::normalize::MatchMode;

/// Points a domain earns per contained trigger.
pub const DOMAIN_TERM_POINTS: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub domain: Option<String>,
    pub topics: Vec<String>,
}

impl Detection {
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

pub fn detect(text: &str, dictionary: &ConceptDictionary, mode: MatchMode) -> Detection {
    let mut best: Option<(&str, u32)> = None;
    for entry in &dictionary.domains {
        let hits = entry.terms.iter().filter(|t| mode.contains(text, t)).count() as u32;
        let score = hits * DOMAIN_TERM_POINTS;
        if score == 0 {
            continue;
        }
        // strict `>` keeps the first domain on ties
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((entry.name.as_str(), score)),
        }
    }

    let topics = dictionary
        .topics
        .iter()
        .filter(|entry| entry.terms.iter().any(|t| mode.contains(text, t)))
        .map(|entry| entry.name.clone())
        .collect();

    Detection {
        domain: best.map(|(name, _)| name.to_string()),
        topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::ConceptEntry;

    fn entry(name: &str, terms: &[&str]) -> ConceptEntry {
        ConceptEntry {
            name: name.to_string(),
            terms: terms.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn dict() -> ConceptDictionary {
        ConceptDictionary {
            domains: vec![
                entry("Workplace", &["boss", "salary"]),
                entry("Police", &["police", "officer"]),
                entry("Documents", &["passport", "id"]),
            ],
            topics: vec![
                entry("Salary", &["salary", "pay"]),
                entry("Phone", &["phone"]),
                entry("Traffic", &["traffic", "helmet"]),
            ],
        }
    }

    #[test]
    fn highest_scoring_domain_wins() {
        let d = detect("police officer took my passport", &dict(), MatchMode::Substring);
        assert_eq!(d.domain.as_deref(), Some("Police"));
    }

    #[test]
    fn first_declared_domain_wins_ties() {
        let d = detect("boss kept my passport", &dict(), MatchMode::Substring);
        assert_eq!(d.domain.as_deref(), Some("Workplace"));
        let d = detect("passport and police", &dict(), MatchMode::Substring);
        assert_eq!(d.domain.as_deref(), Some("Police"));
    }

    #[test]
    fn zero_score_means_no_domain() {
        let d = detect("what is this", &dict(), MatchMode::Substring);
        assert_eq!(d.domain, None);
        assert!(d.topics.is_empty());
    }

    #[test]
    fn topics_are_reported_once_in_declared_order() {
        let d = detect(
            "traffic helmet phone salary pay",
            &dict(),
            MatchMode::Substring,
        );
        assert_eq!(d.topics, vec!["Salary", "Phone", "Traffic"]);
        assert!(d.has_topic("Traffic"));
        assert!(!d.has_topic("Arrest"));
    }

    #[test]
    fn substring_containment_can_false_positive() {
        // "id" inside "valid" counts in the default mode
        let d = detect("is that valid", &dict(), MatchMode::Substring);
        assert_eq!(d.domain.as_deref(), Some("Documents"));
        let d = detect("is that valid", &dict(), MatchMode::WordBoundary);
        assert_eq!(d.domain, None);
    }
}
