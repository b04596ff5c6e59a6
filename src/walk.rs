//! Recursive search over metadata trees
//!
//! Both reference extraction (every `@id` in the document) and section
//! finding (every value under a relation key) are the same traversal with a
//! different accumulation rule, so they share one visitor.

use serde_json::Value;

/// Collect every value stored under `key`, pre-order, at any depth.
///
/// When `descend_into_match` is false the visitor does not recurse into a
/// matched value itself; sibling keys are always descended regardless of a
/// match at the current node.
fn walk_key<'a>(
    value: &'a Value,
    key: &str,
    descend_into_match: bool,
    out: &mut Vec<&'a Value>,
) {
    match value {
        Value::Object(map) => {
            if let Some(matched) = map.get(key) {
                out.push(matched);
            }
            for (k, v) in map {
                if descend_into_match || k != key {
                    walk_key(v, key, descend_into_match, out);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr {
                walk_key(item, key, descend_into_match, out);
            }
        }
        // Scalars carry no keys
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

/// Extract every `@id` value from a metadata tree.
///
/// Results are in pre-order, key-iteration order, with duplicates kept; the
/// archive builder deduplicates later at the path level. Non-string `@id`
/// values are rendered as their JSON text rather than dropped, leaving
/// validation to the caller.
pub fn extract_ids(tree: &Value) -> Vec<String> {
    let mut matches = Vec::new();
    walk_key(tree, "@id", true, &mut matches);
    matches
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

/// Find every value stored under `key` anywhere in the tree.
///
/// A matched array contributes each of its elements individually; any other
/// matched value contributes itself. Matched values are not re-entered by the
/// traversal.
pub fn find_items(tree: &Value, key: &str) -> Vec<Value> {
    let mut matches = Vec::new();
    walk_key(tree, key, false, &mut matches);

    let mut items = Vec::new();
    for matched in matches {
        match matched {
            Value::Array(arr) => items.extend(arr.iter().cloned()),
            other => items.push(other.clone()),
        }
    }
    items
}
