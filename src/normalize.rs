//! Text normalization shared by every matching stage.
//!
//! Input is lowercased, a fixed punctuation set is stripped (not replaced), and
//! the remainder is split on whitespace. The canonical text is the tokens joined
//! by single spaces, so normalizing an already-normalized string is a no-op.
//!
//! Containment checks go through [`MatchMode`]. The default is plain substring
//! containment, so "id" matches inside "valid". Confidence tiers are calibrated
//! against that behaviour; `WordBoundary` is the opt-in strict mode.

use serde::Deserialize;

/// Characters removed before tokenization.
pub const PUNCTUATION: &[char] = &[
    '?', '.', ',', '!', ';', ':', '"', '\'', '‘', '’', '“', '”', '(', ')',
];

/// Canonical form of an utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub tokens: Vec<String>,
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub fn normalize(input: &str) -> Normalized {
    let stripped: String = input
        .to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();

    let tokens: Vec<String> = stripped.split_whitespace().map(str::to_string).collect();
    Normalized {
        text: tokens.join(" "),
        tokens,
    }
}

/// Shorthand for triggers loaded from configuration.
pub fn normalize_text(input: &str) -> String {
    normalize(input).text
}

/// How a trigger is located inside normalized text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Raw substring containment (historical behaviour).
    #[default]
    Substring,
    /// The trigger must start and end on a non-alphanumeric boundary.
    WordBoundary,
}

impl MatchMode {
    /// Parse `substring` | `word` | `word_boundary` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "substring" => Some(Self::Substring),
            "word" | "word_boundary" => Some(Self::WordBoundary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::WordBoundary => "word_boundary",
        }
    }

    /// Empty needles never match.
    pub fn contains(self, haystack: &str, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }
        match self {
            Self::Substring => haystack.contains(needle),
            Self::WordBoundary => haystack.match_indices(needle).any(|(start, m)| {
                let before = haystack[..start].chars().next_back();
                let after = haystack[start + m.len()..].chars().next();
                !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
            }),
        }
    }
}
