//! Deterministic header serialization and body splicing.
//!
//! # Responsibility
//! - Render a property map as a stable YAML block.
//! - Replace an existing header block in a note body, or prepend a new one.
//!
//! # Invariants
//! - Rendering is deterministic: scalars on one line, lists as block
//!   sequences, quoting applied only when YAML would misread the value.
//! - Splicing never touches bytes outside the header block span.
//! - A present-but-unparsable block aborts the splice with
//!   `MalformedHeader`; the body is returned to the caller untouched.

use crate::frontmatter::reader::{extract_block, parse_block};
use crate::frontmatter::FrontmatterResult;
use crate::model::property::{PropertyMap, PropertyValue};
use serde_yaml::Value;

const BLOCK_DELIMITER: &str = "---";

/// Renders one property map as header YAML, delimiter lines excluded.
///
/// Insertion order is preserved. Empty scalars render as a bare `key:` line
/// and empty lists as `key: []` so a round-trip keeps their shape.
pub fn render(map: &PropertyMap) -> String {
    let mut out = String::new();
    for (key, value) in map.iter() {
        match value {
            PropertyValue::Scalar(scalar) if scalar.is_empty() => {
                out.push_str(key);
                out.push_str(":\n");
            }
            PropertyValue::Scalar(scalar) => {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&render_scalar(scalar));
                out.push('\n');
            }
            PropertyValue::List(items) if items.is_empty() => {
                out.push_str(key);
                out.push_str(": []\n");
            }
            PropertyValue::List(items) => {
                out.push_str(key);
                out.push_str(":\n");
                for item in items {
                    out.push_str("  - ");
                    out.push_str(&render_scalar(item));
                    out.push('\n');
                }
            }
        }
    }
    out
}

/// Replaces the header block of `body` with `map`, or prepends one.
///
/// Fails without modifying anything when the existing block is malformed;
/// the returned error carries the parse reason for user notification.
pub fn splice(body: &str, map: &PropertyMap) -> FrontmatterResult<String> {
    let rendered = format!("{BLOCK_DELIMITER}\n{}{BLOCK_DELIMITER}\n", render(map));

    match extract_block(body)? {
        Some(block) => {
            // Strict read-before-write: refuse to replace a block we cannot
            // fully parse.
            parse_block(block.yaml)?;
            let mut updated = String::with_capacity(body.len() + rendered.len());
            updated.push_str(&body[..block.span.start]);
            updated.push_str(&rendered);
            updated.push_str(&body[block.span.end..]);
            Ok(updated)
        }
        None => {
            let mut updated = String::with_capacity(body.len() + rendered.len());
            updated.push_str(&rendered);
            updated.push_str(body);
            Ok(updated)
        }
    }
}

/// Quotes one scalar only when YAML would misread the bare form.
///
/// A value stays bare only when parsing the bare form yields the identical
/// string again, which keeps canonical numbers and booleans bare while
/// quoting re-typed spellings such as `null`, `True`, `1e3` or `0x10`.
fn render_scalar(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn needs_quoting(value: &str) -> bool {
    if value.is_empty() || value.contains('\n') {
        return true;
    }
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return true;
    }
    !bare_form_round_trips(value)
}

/// Checks that the bare spelling re-reads as the same scalar string under
/// the reader's normalization (null maps to empty, bool/number to their
/// canonical display form).
fn bare_form_round_trips(value: &str) -> bool {
    match serde_yaml::from_str::<Value>(value) {
        Ok(Value::String(text)) => text == value,
        Ok(Value::Bool(flag)) => flag.to_string() == value,
        Ok(Value::Number(number)) => number.to_string() == value,
        Ok(_) | Err(_) => false,
    }
}
