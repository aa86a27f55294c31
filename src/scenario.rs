//! Scenario Matcher: stock authority phrases that bypass general ranking.
//!
//! A said-phrase contained in the text matches unconditionally. Keywords only
//! count once the cheap gate is open (authority domain detected, traffic topic
//! detected, or a gate literal present) and the traffic topic was detected.
//! The first scenario in catalog order that matches wins; there is no scoring.

use crate::detect::Detection;
use crate::knowledge::{KnowledgeBase, ScenarioRecord};
use crate::normalize::MatchMode;

/// Whether keyword triggers are considered at all.
pub fn gate_open(text: &str, detection: &Detection, kb: &KnowledgeBase) -> bool {
    let policy = kb.policy();
    detection.domain.as_deref() == Some(policy.authority_domain.as_str())
        || detection.has_topic(&policy.traffic_topic)
        || policy.gate_literals.iter().any(|lit| text.contains(lit.as_str()))
}

/// Find the first scenario whose said-phrase is in the text, or whose keyword is
/// in the text while the gate is open and the traffic topic is detected.
pub fn match_scenario<'a>(
    text: &str,
    detection: &Detection,
    kb: &'a KnowledgeBase,
    mode: MatchMode,
) -> Option<&'a ScenarioRecord> {
    let keywords_live = gate_open(text, detection, kb) && detection.has_topic(&kb.policy().traffic_topic);
    kb.scenarios
        .iter()
        .find(|s| {
            s.phrases.iter().any(|p| mode.contains(text, p))
                || (keywords_live && s.keywords.iter().any(|k| mode.contains(text, k)))
        })
        .map(|s| &s.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect;
    use crate::normalize::normalize;

    const KB: &str = r#"
[[domains]]
name = "Police"
terms = ["police", "officer"]

[[topics]]
name = "Traffic"
terms = ["traffic", "bike"]

[[rules]]
id = "r"
domain = "Police"
topic = "Traffic"
summary = "s"
detailed_explanation = "e"
verdict = "MUST_STOP"

[[scenarios]]
id = "first"
title = "First"
keywords = ["keys"]
said_phrases = ["Give me your keys!"]
summary = "s"
detailed_explanation = "e"
verdict = "CANNOT"

[[scenarios]]
id = "second"
title = "Second"
keywords = ["keys", "licence"]
said_phrases = ["show me your licence"]
summary = "s"
detailed_explanation = "e"
verdict = "MUST_SHOW"
"#;

    fn run(input: &str) -> Option<String> {
        let kb = KnowledgeBase::from_toml_str(KB).expect("load");
        let n = normalize(input);
        let d = detect(&n.text, kb.dictionary(), MatchMode::Substring);
        match_scenario(&n.text, &d, &kb, MatchMode::Substring).map(|s| s.id.clone())
    }

    #[test]
    fn said_phrase_matches_after_normalization() {
        assert_eq!(run("The officer said: give me your KEYS."), Some("first".into()));
    }

    #[test]
    fn keyword_requires_traffic_topic() {
        assert_eq!(run("police wants my licence"), None);
        assert_eq!(run("police on my bike wants my licence"), Some("second".into()));
    }

    #[test]
    fn first_scenario_in_catalog_order_wins() {
        // both scenarios list "keys"; only the first is reported
        assert_eq!(run("traffic stop, asked for keys"), Some("first".into()));
    }

    #[test]
    fn said_phrase_matches_without_any_domain_or_topic() {
        assert_eq!(run("a stranger said show me your licence"), Some("second".into()));
        assert_eq!(run("Give me your keys"), Some("first".into()));
    }

    #[test]
    fn closed_gate_ignores_keywords() {
        assert_eq!(run("where are my keys"), None);
    }

    #[test]
    fn gate_literal_alone_opens_gate() {
        let kb = KnowledgeBase::from_toml_str(KB).expect("load");
        let d = Detection::default();
        assert!(gate_open("stuck in traffic", &d, &kb));
        assert!(!gate_open("stuck at home", &d, &kb));
    }
}
