//! Author and affiliation entry parsing.
//!
//! Authors are written `Name (1)(2)` or `Name (1,2)`; affiliations are
//! written `(1)Institute`. Only parenthesised groups of word tokens count as
//! references; other parenthesised phrases stay part of the name. Reference
//! markers are rendered as superscript.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A parsed author entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name, trimmed
    pub name: String,
    /// Affiliation references joined with ", " (empty when none)
    pub refs: String,
}

impl Author {
    /// Name with inner spaces replaced by non-breaking spaces.
    pub fn non_breaking_name(&self) -> String {
        self.name.replace(' ', "\u{00A0}")
    }
}

/// A parsed affiliation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Reference number(s) joined with ", " (empty when none)
    pub refs: String,
    /// Affiliation name, trimmed
    pub name: String,
}

/// Parser for author and affiliation entries.
///
/// Patterns are compiled once; build one parser per run and reuse it.
#[derive(Debug, Clone)]
pub struct NameParser {
    author: Regex,
    affiliation: Regex,
    ref_marker: Regex,
    ref_token: Regex,
}

impl NameParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self {
            author: Regex::new(
                r"^([^()][^()]*(?:\([^()]*\)[^()]*)*?)((?:\s*\(\s*\w+(?:\s*,\s*\w+)*\s*\))*)$",
            )
            .expect("valid author pattern"),
            affiliation: Regex::new(r"^((?:\(\s*\w+(?:\s*,\s*\w+)*\s*\)\s*)*)(.+)$")
                .expect("valid affiliation pattern"),
            ref_marker: Regex::new(r"\(\w+\)").expect("valid marker pattern"),
            ref_token: Regex::new(r"\w+").expect("valid token pattern"),
        }
    }

    /// Parse an author entry. `row` is used for error reporting.
    pub fn parse_author(&self, text: &str, row: usize) -> Result<Author> {
        let text = text.trim();
        let caps = self
            .author
            .captures(text)
            .ok_or_else(|| Error::AuthorParse {
                row,
                text: text.to_string(),
            })?;
        Ok(Author {
            name: caps[1].trim().to_string(),
            refs: self.join_refs(caps[2].trim()),
        })
    }

    /// Parse an affiliation entry. `row` is used for error reporting.
    pub fn parse_affiliation(&self, text: &str, row: usize) -> Result<Affiliation> {
        let text = text.trim();
        let caps = self
            .affiliation
            .captures(text)
            .ok_or_else(|| Error::AffiliationParse {
                row,
                text: text.to_string(),
            })?;
        Ok(Affiliation {
            refs: self.join_refs(caps[1].trim()),
            name: caps[2].trim().to_string(),
        })
    }

    /// Strip parentheses from reference groups and join the tokens with ", ".
    pub fn join_refs(&self, groups: &str) -> String {
        self.ref_token
            .find_iter(groups)
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Split a free-form author line into alternating text and `(ref)` markers.
    ///
    /// Returns `(text, is_marker)` pairs; markers keep their parentheses.
    pub fn split_markers<'a>(&self, text: &'a str) -> Vec<(&'a str, bool)> {
        let mut parts = Vec::new();
        let mut last = 0;
        for m in self.ref_marker.find_iter(text) {
            if m.start() > last {
                parts.push((&text[last..m.start()], false));
            }
            parts.push((m.as_str(), true));
            last = m.end();
        }
        if last < text.len() {
            parts.push((&text[last..], false));
        }
        parts
    }
}

impl Default for NameParser {
    fn default() -> Self {
        Self::new()
    }
}
