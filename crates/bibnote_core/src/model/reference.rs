//! Bibliographic reference domain model and parser seam.
//!
//! # Responsibility
//! - Define the canonical parsed-record shape consumed by note services.
//! - Provide author-name normalization helpers for cross-link generation.
//! - Declare the external parser contract; the grammar itself lives outside
//!   this crate.
//!
//! # Invariants
//! - `citation_key` is non-empty and restricted to a path-safe charset.
//! - Field names are stored lowercase; lookups are lowercase-only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static CITATION_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_:.+-]*$").expect("valid citation key regex"));

/// One parsed bibliographic record.
///
/// Produced by an external [`ReferenceParser`]; this core only consumes the
/// structured output and never touches the source grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Short identifier used for cross-referencing and note paths.
    pub citation_key: String,
    /// Record category as reported by the parser (`article`, `book`, ...).
    pub kind: String,
    /// Field name to raw value, names lowercase.
    pub fields: BTreeMap<String, String>,
}

impl Reference {
    /// Creates a reference with an empty field map.
    pub fn new(citation_key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            citation_key: citation_key.into(),
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets one field, normalizing the name to lowercase.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_lowercase(), value.into());
    }

    /// Returns one field value by lowercase name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns author display names in record order.
    ///
    /// Splits the `author` field on the conventional ` and ` separator and
    /// normalizes `Last, First` into `First Last`.
    pub fn authors(&self) -> Vec<String> {
        let raw = match self.field("author") {
            Some(value) => value,
            None => return Vec::new(),
        };
        raw.split(" and ")
            .filter_map(|name| normalize_author_name(name))
            .collect()
    }

    /// Validates record shape before note generation.
    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        if self.citation_key.trim().is_empty() {
            return Err(ReferenceValidationError::EmptyCitationKey);
        }
        if !CITATION_KEY_RE.is_match(&self.citation_key) {
            return Err(ReferenceValidationError::InvalidCitationKey(
                self.citation_key.clone(),
            ));
        }
        if self.kind.trim().is_empty() {
            return Err(ReferenceValidationError::EmptyKind(
                self.citation_key.clone(),
            ));
        }
        Ok(())
    }
}

/// Normalizes one author name fragment for display and linking.
///
/// Returns `None` for blank fragments so trailing separators do not produce
/// ghost authors.
pub fn normalize_author_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once(',') {
        Some((last, first)) => {
            let first = first.trim();
            let last = last.trim();
            if first.is_empty() {
                Some(last.to_string())
            } else {
                Some(format!("{first} {last}"))
            }
        }
        None => Some(trimmed.to_string()),
    }
}

/// Reference shape violations caught before note generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceValidationError {
    EmptyCitationKey,
    InvalidCitationKey(String),
    EmptyKind(String),
}

impl Display for ReferenceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCitationKey => write!(f, "citation key must not be empty"),
            Self::InvalidCitationKey(key) => {
                write!(f, "citation key contains unsupported characters: `{key}`")
            }
            Self::EmptyKind(key) => write!(f, "reference kind missing for `{key}`"),
        }
    }
}

impl Error for ReferenceValidationError {}

/// Parse failure from the external bibliographic grammar.
///
/// The message is user-presentable; the core surfaces it and declines to
/// proceed instead of crashing the reconciliation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "reference source could not be parsed: {}", self.message)
    }
}

impl Error for ParseError {}

/// External parser contract.
///
/// Implementations wrap a bibliographic grammar library; this core consumes
/// only the structured output.
pub trait ReferenceParser {
    /// Parses raw citation-source text into structured records.
    fn parse(&self, source: &str) -> Result<Vec<Reference>, ParseError>;
}
