use std::path::PathBuf;

/// Load-time knowledge base failures. All of them are fatal to startup; none
/// can surface from a `classify` call.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed knowledge base: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),

    #[error("duplicate scenario id: {0}")]
    DuplicateScenarioId(String),

    #[error("rule `{rule_id}` option `{label}` targets unknown rule `{target}`")]
    DanglingOption {
        rule_id: String,
        label: String,
        target: String,
    },

    #[error("rule `{0}` has an option pointing at itself")]
    SelfReference(String),

    #[error("option graph contains a cycle: {}", .0.join(" -> "))]
    OptionCycle(Vec<String>),

    #[error("dictionary domain `{0}` has no rule records")]
    OrphanDomain(String),

    #[error("{owner} has a trigger that normalizes to an empty string")]
    EmptyTrigger { owner: String },
}
