use regex::{Regex, RegexBuilder};

use crate::error::RagError;

const SOFT_HYPHEN: char = '\u{ad}';

/// Collapses every whitespace run (newlines included) to a single space,
/// drops soft hyphens, and trims both ends.
pub fn normalize(raw: &str) -> String {
    raw.replace(SOFT_HYPHEN, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Denylist of recurring page banners, matched case-insensitively.
///
/// Only the configured patterns are removed; arbitrary repetition is left alone.
#[derive(Debug, Clone)]
pub struct Boilerplate {
    patterns: Vec<Regex>,
}

impl Boilerplate {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RagError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        RagError::Configuration(format!(
                            "invalid header pattern {:?}: {e}",
                            p.as_ref()
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A denylist that removes nothing; `strip` then only normalizes.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Replaces every banner match with a space, then re-normalizes.
    pub fn strip(&self, text: &str) -> String {
        let mut out = text.to_string();
        for re in &self.patterns {
            out = re.replace_all(&out, " ").into_owned();
        }
        normalize(&out)
    }
}
