//! Property map merge policy.
//!
//! # Responsibility
//! - Combine an existing property map with an incoming one, field by field.
//! - Keep the merge pure: inputs are never mutated, the result is a fresh
//!   map.
//!
//! # Invariants
//! - The only deletion path is an explicitly empty incoming value combined
//!   with `clear_empty = true`; keys absent from `incoming` always survive.
//! - Every list-shaped result is deduplicated and sorted with plain
//!   byte-wise lexicographic ordering.
//! - Scalar/list shape mismatches promote to a list; no data is lost.

use crate::model::property::{PropertyMap, PropertyValue};
use std::collections::BTreeSet;

/// Merges `incoming` into `existing` and returns a new map.
///
/// Per key in `incoming`:
/// - empty value (empty scalar or empty list): removed when `clear_empty`,
///   otherwise the existing value is left untouched;
/// - list into list: set union, sorted;
/// - scalar into list / list into scalar: promoted to a combined list,
///   deduplicated and sorted;
/// - scalar into scalar: incoming overwrites.
///
/// Existing keys keep their positions; keys new to the map are appended in
/// `incoming` order.
pub fn merge(existing: &PropertyMap, incoming: &PropertyMap, clear_empty: bool) -> PropertyMap {
    let mut merged = PropertyMap::new();

    for (key, current) in existing.iter() {
        match incoming.get(key) {
            None => merged.insert(key, current.clone()),
            Some(update) if update.is_empty() => {
                if !clear_empty {
                    merged.insert(key, current.clone());
                }
            }
            Some(update) => merged.insert(key, merge_value(current, update)),
        }
    }

    for (key, update) in incoming.iter() {
        if existing.contains_key(key) || update.is_empty() {
            continue;
        }
        merged.insert(key, normalize_new_value(update));
    }

    merged
}

fn merge_value(current: &PropertyValue, update: &PropertyValue) -> PropertyValue {
    match (current, update) {
        (PropertyValue::Scalar(_), PropertyValue::Scalar(value)) => {
            PropertyValue::Scalar(value.clone())
        }
        (PropertyValue::List(left), PropertyValue::List(right)) => {
            union_list(left.iter().chain(right.iter()))
        }
        (PropertyValue::List(left), PropertyValue::Scalar(value)) => {
            union_list(left.iter().chain(std::iter::once(value)))
        }
        (PropertyValue::Scalar(value), PropertyValue::List(right)) => {
            union_list(std::iter::once(value).chain(right.iter()))
        }
    }
}

/// Keys new to the map still get deterministic list ordering.
fn normalize_new_value(update: &PropertyValue) -> PropertyValue {
    match update {
        PropertyValue::Scalar(value) => PropertyValue::Scalar(value.clone()),
        PropertyValue::List(values) => union_list(values.iter()),
    }
}

fn union_list<'a>(values: impl Iterator<Item = &'a String>) -> PropertyValue {
    let unique: BTreeSet<&String> = values.collect();
    PropertyValue::List(unique.into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::merge;
    use crate::model::property::{PropertyMap, PropertyValue};

    fn map(entries: &[(&str, PropertyValue)]) -> PropertyMap {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn untouched_keys_survive_unchanged() {
        let existing = map(&[
            ("title", PropertyValue::scalar("kept")),
            ("tags", PropertyValue::list(["a"])),
        ]);
        let incoming = map(&[("year", PropertyValue::scalar("2020"))]);

        let merged = merge(&existing, &incoming, true);
        assert_eq!(merged.get("title"), Some(&PropertyValue::scalar("kept")));
        assert_eq!(merged.get("tags"), Some(&PropertyValue::list(["a"])));
        assert_eq!(merged.get("year"), Some(&PropertyValue::scalar("2020")));
    }

    #[test]
    fn list_union_is_deduplicated_and_sorted() {
        let existing = map(&[("tags", PropertyValue::list(["b", "a"]))]);
        let incoming = map(&[("tags", PropertyValue::list(["a", "c"]))]);
        let merged = merge(&existing, &incoming, false);
        assert_eq!(merged.get("tags"), Some(&PropertyValue::list(["a", "b", "c"])));
    }

    #[test]
    fn scalar_into_list_appends_and_sorts() {
        let existing = map(&[("tags", PropertyValue::list(["x"]))]);
        let incoming = map(&[("tags", PropertyValue::scalar("y"))]);
        let merged = merge(&existing, &incoming, false);
        assert_eq!(merged.get("tags"), Some(&PropertyValue::list(["x", "y"])));
    }

    #[test]
    fn list_into_scalar_promotes_without_loss() {
        let existing = map(&[("tags", PropertyValue::scalar("x"))]);
        let incoming = map(&[("tags", PropertyValue::list(["y", "x"]))]);
        let merged = merge(&existing, &incoming, false);
        assert_eq!(merged.get("tags"), Some(&PropertyValue::list(["x", "y"])));
    }

    #[test]
    fn scalar_overwrites_scalar() {
        let existing = map(&[("title", PropertyValue::scalar("old"))]);
        let incoming = map(&[("title", PropertyValue::scalar("new"))]);
        let merged = merge(&existing, &incoming, false);
        assert_eq!(merged.get("title"), Some(&PropertyValue::scalar("new")));
    }

    #[test]
    fn empty_incoming_clears_only_with_clear_empty() {
        let existing = map(&[("tags", PropertyValue::list(["x"]))]);
        let cleared = merge(
            &existing,
            &map(&[("tags", PropertyValue::scalar(""))]),
            true,
        );
        assert!(cleared.get("tags").is_none());

        let kept = merge(
            &existing,
            &map(&[("tags", PropertyValue::scalar(""))]),
            false,
        );
        assert_eq!(kept.get("tags"), Some(&PropertyValue::list(["x"])));
    }

    #[test]
    fn empty_incoming_list_follows_the_same_rule_as_empty_scalar() {
        let existing = map(&[("tags", PropertyValue::list(["x"]))]);
        let incoming = map(&[("tags", PropertyValue::List(Vec::new()))]);
        assert!(merge(&existing, &incoming, true).get("tags").is_none());
        assert_eq!(
            merge(&existing, &incoming, false).get("tags"),
            Some(&PropertyValue::list(["x"]))
        );
    }

    #[test]
    fn clearing_an_absent_key_is_a_no_op() {
        let existing = PropertyMap::new();
        let incoming = map(&[("tags", PropertyValue::scalar(""))]);
        assert!(merge(&existing, &incoming, true).is_empty());
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = map(&[
            ("title", PropertyValue::scalar("old")),
            ("tags", PropertyValue::list(["b", "a"])),
            ("only", PropertyValue::scalar("here")),
        ]);
        let incoming = map(&[
            ("title", PropertyValue::scalar("new")),
            ("tags", PropertyValue::scalar("c")),
            ("year", PropertyValue::scalar("2020")),
        ]);

        let once = merge(&existing, &incoming, false);
        let twice = merge(&once, &incoming, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let existing = map(&[("tags", PropertyValue::list(["b", "a"]))]);
        let incoming = map(&[("tags", PropertyValue::list(["c"]))]);
        let _ = merge(&existing, &incoming, true);
        assert_eq!(existing.get("tags"), Some(&PropertyValue::list(["b", "a"])));
        assert_eq!(incoming.get("tags"), Some(&PropertyValue::list(["c"])));
    }
}
