// tests/knowledge_integrity.rs
//
// Load-time validation of knowledge base documents. Every broken document must
// be rejected before any classification can run.

use std::io::Write as _;

use situation_classifier::knowledge::{KnowledgeBase, KnowledgeBaseError};

const DOMAINS: &str = r#"
[[domains]]
name = "Workplace"
terms = ["boss"]
"#;

fn rule(id: &str, options: &[(&str, &str)]) -> String {
    let opts = options
        .iter()
        .map(|(label, target)| format!(r#"{{ label = "{label}", target_rule_id = "{target}" }}"#))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"
[[rules]]
id = "{id}"
domain = "Workplace"
topic = "Salary"
summary = "s"
detailed_explanation = "e"
verdict = "DEPENDS"
options = [{opts}]
"#
    )
}

fn load(rules: &[String]) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let doc = format!("{DOMAINS}{}", rules.concat());
    KnowledgeBase::from_toml_str(&doc)
}

#[test]
fn well_formed_option_graph_loads() {
    let kb = load(&[
        rule("a", &[("to b", "b"), ("to c", "c")]),
        rule("b", &[("to c", "c")]),
        rule("c", &[]),
    ])
    .expect("acyclic graph should load");

    let a = kb.rule("a").expect("a");
    let targets: Vec<&str> = kb
        .resolve_options(a)
        .into_iter()
        .map(|(_, r)| r.id.as_str())
        .collect();
    assert_eq!(targets, vec!["b", "c"]);
    assert_eq!(kb.follow_option("a", " TO C ").map(|r| r.id.as_str()), Some("c"));
    assert!(kb.follow_option("a", "to nowhere").is_none());
}

#[test]
fn dangling_option_is_rejected() {
    let err = load(&[rule("a", &[("go", "missing")])]).unwrap_err();
    match err {
        KnowledgeBaseError::DanglingOption { rule_id, target, .. } => {
            assert_eq!(rule_id, "a");
            assert_eq!(target, "missing");
        }
        other => panic!("expected DanglingOption, got {other:?}"),
    }
}

#[test]
fn self_reference_is_rejected() {
    let err = load(&[rule("a", &[("again", "a")])]).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::SelfReference(ref id) if id == "a"));
}

#[test]
fn option_cycle_is_rejected_and_reported() {
    let err = load(&[
        rule("a", &[("next", "b")]),
        rule("b", &[("next", "c")]),
        rule("c", &[("back", "a")]),
    ])
    .unwrap_err();
    match &err {
        KnowledgeBaseError::OptionCycle(path) => {
            assert_eq!(path.first(), path.last());
            assert!(path.len() >= 3);
        }
        other => panic!("expected OptionCycle, got {other:?}"),
    }
    assert!(err.to_string().contains(" -> "));
}

#[test]
fn duplicate_rule_id_is_rejected() {
    let err = load(&[rule("a", &[]), rule("a", &[])]).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::DuplicateRuleId(ref id) if id == "a"));
}

#[test]
fn duplicate_scenario_id_is_rejected() {
    let scenario = r#"
[[scenarios]]
id = "s"
title = "t"
keywords = ["keys"]
said_phrases = []
summary = "s"
detailed_explanation = "e"
verdict = "CANNOT"
"#;
    let doc = format!("{DOMAINS}{}{scenario}{scenario}", rule("a", &[]));
    let err = KnowledgeBase::from_toml_str(&doc).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::DuplicateScenarioId(ref id) if id == "s"));
}

#[test]
fn domain_without_rules_is_rejected() {
    let doc = format!(
        "{DOMAINS}\n[[domains]]\nname = \"College\"\nterms = [\"college\"]\n{}",
        rule("a", &[])
    );
    let err = KnowledgeBase::from_toml_str(&doc).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::OrphanDomain(ref d) if d == "College"));
}

#[test]
fn punctuation_only_trigger_is_rejected() {
    let doc = format!(
        "[[domains]]\nname = \"Workplace\"\nterms = [\"boss\", \"?!\"]\n{}",
        rule("a", &[])
    );
    let err = KnowledgeBase::from_toml_str(&doc).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::EmptyTrigger { .. }));
}

#[test]
fn unknown_verdict_is_a_parse_error() {
    let doc = format!("{DOMAINS}{}", rule("a", &[])).replace("DEPENDS", "MAYBE");
    let err = KnowledgeBase::from_toml_str(&doc).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::Parse(_)));
}

#[test]
fn loads_from_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, "{DOMAINS}{}", rule("a", &[])).expect("write");
    let kb = KnowledgeBase::from_path(file.path()).expect("load from file");
    assert_eq!(kb.rules().count(), 1);
}

#[test]
fn bundled_knowledge_base_passes_validation() {
    let kb = KnowledgeBase::builtin().expect("bundled kb must be valid");
    for rule in kb.rules() {
        for (opt, target) in kb.resolve_options(rule) {
            assert_ne!(target.id, rule.id, "option `{}` loops back", opt.label);
        }
        assert!(kb.related_phrases(&rule.id).is_some_and(|s| !s.is_empty()));
    }
}
