//! Header block extraction and property projection.
//!
//! # Responsibility
//! - Locate the delimited header block at the top of a note body.
//! - Parse its YAML text into a `PropertyMap`, rejecting shapes outside the
//!   scalar-or-flat-list model.
//! - Project single properties with declared scalar/list normalization.
//!
//! # Invariants
//! - The block must start on the first line (optional BOM allowed) and be
//!   terminated by a `---` or `...` line; an opened but unterminated block
//!   is malformed, not absent.
//! - Parsing is strict: any YAML error surfaces as `MalformedHeader`.

use crate::frontmatter::{FrontmatterError, FrontmatterResult};
use crate::model::property::{PropertyMap, PropertyValue};
use serde_yaml::Value;
use std::ops::Range;

const BLOCK_DELIMITER: &str = "---";
const BLOCK_TERMINATOR: &str = "...";

/// Raw header block located inside one note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock<'a> {
    /// YAML text between the delimiter lines.
    pub yaml: &'a str,
    /// Byte range of the whole block, delimiters included, within the body.
    /// Text before the range start (a BOM, at most) is preserved by splicing.
    pub span: Range<usize>,
}

/// Locates the header block at the top of `body`.
///
/// Returns `Ok(None)` when the body does not open with a delimiter line.
/// Returns `MalformedHeader` when a block is opened but never terminated.
pub fn extract_block(body: &str) -> FrontmatterResult<Option<HeaderBlock<'_>>> {
    let start = if body.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let rest = &body[start..];

    let first_line_end = rest.find('\n').map_or(rest.len(), |pos| pos + 1);
    let first_line = rest[..first_line_end].trim_end_matches(['\n', '\r']);
    if first_line != BLOCK_DELIMITER {
        return Ok(None);
    }

    let mut cursor = first_line_end;
    let yaml_start = cursor;
    while cursor < rest.len() {
        let line_end = rest[cursor..]
            .find('\n')
            .map_or(rest.len(), |pos| cursor + pos + 1);
        let line = rest[cursor..line_end].trim_end_matches(['\n', '\r']);
        if line == BLOCK_DELIMITER || line == BLOCK_TERMINATOR {
            return Ok(Some(HeaderBlock {
                yaml: &rest[yaml_start..cursor],
                span: start..start + line_end,
            }));
        }
        cursor = line_end;
    }

    Err(FrontmatterError::MalformedHeader(
        "header block opened but never terminated".to_string(),
    ))
}

/// Parses header YAML text into a property map.
///
/// Empty text yields an empty map. Mapping values must be scalars or flat
/// lists of scalars; anything else is malformed.
pub fn parse_block(yaml: &str) -> FrontmatterResult<PropertyMap> {
    if yaml.trim().is_empty() {
        return Ok(PropertyMap::new());
    }

    let parsed: Value = serde_yaml::from_str(yaml)
        .map_err(|err| FrontmatterError::MalformedHeader(err.to_string()))?;

    // serde_yaml mappings preserve document order, which keeps hand-arranged
    // headers stable across a read/write round-trip.
    let mapping = match parsed {
        Value::Null => return Ok(PropertyMap::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(FrontmatterError::MalformedHeader(format!(
                "expected a key/value mapping, found {}",
                value_kind(&other)
            )));
        }
    };

    let mut map = PropertyMap::new();
    for (key, value) in mapping {
        let key = match key {
            Value::String(key) => key,
            other => {
                return Err(FrontmatterError::MalformedHeader(format!(
                    "property names must be strings, found {}",
                    value_kind(&other)
                )));
            }
        };
        map.insert(key, yaml_to_property(value)?);
    }
    Ok(map)
}

/// Returns a property normalized to list shape.
///
/// Absent keys and empty scalars yield an empty list; a non-empty scalar is
/// promoted to a singleton.
pub fn read_list(map: &PropertyMap, key: &str) -> Vec<String> {
    match map.get(key) {
        None => Vec::new(),
        Some(PropertyValue::Scalar(value)) if value.is_empty() => Vec::new(),
        Some(PropertyValue::Scalar(value)) => vec![value.clone()],
        Some(PropertyValue::List(values)) => values.clone(),
    }
}

/// Returns a property normalized to scalar shape.
///
/// Absent keys yield an empty string; a list collapses to its first element.
pub fn read_scalar(map: &PropertyMap, key: &str) -> String {
    match map.get(key) {
        None => String::new(),
        Some(PropertyValue::Scalar(value)) => value.clone(),
        Some(PropertyValue::List(values)) => values.first().cloned().unwrap_or_default(),
    }
}

fn yaml_to_property(value: Value) -> FrontmatterResult<PropertyValue> {
    match value {
        Value::Sequence(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(yaml_to_scalar(item)?);
            }
            Ok(PropertyValue::List(list))
        }
        other => Ok(PropertyValue::Scalar(yaml_to_scalar(other)?)),
    }
}

fn yaml_to_scalar(value: Value) -> FrontmatterResult<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text),
        other => Err(FrontmatterError::MalformedHeader(format!(
            "nested {} values are not supported in the header",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
