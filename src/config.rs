// Service configuration read from the environment (after `dotenvy::dotenv()`).

use std::path::PathBuf;

use anyhow::Context as _;
use tracing::{info, warn};

use crate::knowledge::KnowledgeBase;
use crate::normalize::MatchMode;

pub const ENV_KNOWLEDGE_BASE_PATH: &str = "KNOWLEDGE_BASE_PATH";
pub const ENV_MATCH_MODE: &str = "CLASSIFIER_MATCH_MODE";
pub const ENV_DEV_LOG: &str = "CLASSIFIER_DEV_LOG";
pub const ENV_SHUTTLE_ENV: &str = "SHUTTLE_ENV";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `None` means the bundled knowledge base.
    pub knowledge_base_path: Option<PathBuf>,
    pub match_mode: MatchMode,
    pub dev_log: bool,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let knowledge_base_path = std::env::var(ENV_KNOWLEDGE_BASE_PATH)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            knowledge_base_path,
            match_mode: parse_match_mode_env(std::env::var(ENV_MATCH_MODE).ok()),
            dev_log: dev_logging_enabled(),
        }
    }

    /// Load the configured knowledge base. A configured path that cannot be
    /// read or validated is an error; there is no silent fallback.
    pub fn load_knowledge_base(&self) -> anyhow::Result<KnowledgeBase> {
        match &self.knowledge_base_path {
            Some(path) => {
                info!(path = %path.display(), "loading knowledge base");
                KnowledgeBase::from_path(path)
                    .with_context(|| format!("knowledge base at {}", path.display()))
            }
            None => KnowledgeBase::builtin().context("bundled knowledge base"),
        }
    }
}

/// Unset means default; unknown values fall back to default with a warning.
pub fn parse_match_mode_env(raw: Option<String>) -> MatchMode {
    let Some(raw) = raw else {
        return MatchMode::default();
    };
    if raw.trim().is_empty() {
        return MatchMode::default();
    }
    match MatchMode::parse(&raw) {
        Some(mode) => mode,
        None => {
            warn!(value = %raw, "unknown {}; using {}", ENV_MATCH_MODE, MatchMode::default().as_str());
            MatchMode::default()
        }
    }
}

/// CLASSIFIER_DEV_LOG=1 AND a dev environment (debug build or SHUTTLE_ENV in
/// {local, development, dev}).
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var(ENV_SHUTTLE_ENV)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_mode_env_parsing() {
        assert_eq!(parse_match_mode_env(None), MatchMode::Substring);
        assert_eq!(parse_match_mode_env(Some(" ".into())), MatchMode::Substring);
        assert_eq!(parse_match_mode_env(Some("word".into())), MatchMode::WordBoundary);
        assert_eq!(parse_match_mode_env(Some("SUBSTRING".into())), MatchMode::Substring);
        assert_eq!(parse_match_mode_env(Some("fuzzy".into())), MatchMode::Substring);
    }

    #[test]
    fn default_config_loads_bundled_kb() {
        let kb = ServiceConfig::default().load_knowledge_base().expect("bundled");
        assert!(kb.rule("workplace_salary_withheld").is_some());
    }

    #[test]
    fn missing_file_is_an_error() {
        let cfg = ServiceConfig {
            knowledge_base_path: Some(PathBuf::from("does/not/exist.toml")),
            ..ServiceConfig::default()
        };
        let err = cfg.load_knowledge_base().unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.toml"));
    }
}
