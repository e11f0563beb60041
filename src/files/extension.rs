//! File extension allow-list.
//!
//! # Design Decisions
//! - The allow-list is a pipe-separated set ("mp4|jpg"), not a free regex;
//!   each entry is escaped and the whole set anchored
//! - Matching is case-insensitive; the extracted token is lower-cased
//! - Compiled once at startup and shared by every request

use regex::{Regex, RegexBuilder};

/// Result of checking one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCheck {
    /// Whether the file may be stored.
    pub allowed: bool,
    /// Lower-cased text after the last `.`, empty when there is none.
    pub extension: String,
}

/// Compiled extension allow-list.
#[derive(Debug, Clone)]
pub struct ExtensionValidator {
    /// `None` when the allow-list has no entries; nothing is admissible then.
    pattern: Option<Regex>,
}

impl ExtensionValidator {
    /// Compile a pipe-separated allow-list such as `"mp4|jpg"`.
    pub fn new(allow_list: &str) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = allow_list
            .split('|')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(|ext| regex::escape(&ext.to_lowercase()))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&format!("^(?:{})$", alternatives.join("|")))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Check a client-supplied filename.
    pub fn check(&self, filename: &str) -> ExtensionCheck {
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return ExtensionCheck {
                allowed: false,
                extension: String::new(),
            };
        };

        let extension = ext.to_lowercase();
        let allowed = !extension.is_empty()
            && self
                .pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(&extension));

        ExtensionCheck { allowed, extension }
    }
}
