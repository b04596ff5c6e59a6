//! JSON-LD expansion of metadata trees
//!
//! Rewrites a metadata document into its expanded form: keys and `@type`
//! values become absolute IRIs via the context's term definitions, and
//! relative `@id` values are resolved against the base IRI. This is not a
//! general JSON-LD processor; it covers context application and reference
//! absolutization, which is all the page contract consumes.

use std::collections::HashMap;

use serde_json::{Map, Value};
use url::Url;

use crate::context::ContextUnit;

/// Term definitions extracted from one context unit.
///
/// Three kinds matter here: prefix mappings (`"dc": ".../dc/elements/1.1/"`),
/// term-to-IRI mappings (simple string or extended `{"@id": …}` definitions),
/// and a `@vocab` default for bare terms.
#[derive(Debug, Default)]
struct TermMap {
    prefixes: HashMap<String, String>,
    terms: HashMap<String, String>,
    vocab: Option<String>,
}

impl TermMap {
    /// Build a term map from a context unit, unwrapping an outer `@context`
    /// key when the unit holds a fetched context document
    fn from_unit(unit: &ContextUnit) -> Self {
        let mut map = TermMap::default();
        let value = unit
            .context
            .get("@context")
            .unwrap_or(&unit.context);
        map.collect(value);
        map
    }

    fn collect(&mut self, value: &Value) {
        match value {
            Value::Object(entries) => {
                // Prefixes first so later term definitions can use them
                for (key, v) in entries {
                    if let Some(uri) = v.as_str() {
                        if is_prefix_uri(uri) && !key.starts_with('@') {
                            self.prefixes.insert(key.clone(), uri.to_string());
                        }
                    }
                }
                for (key, v) in entries {
                    self.collect_entry(key, v);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.collect(item);
                }
            }
            // A bare URL string inside a context defines no terms
            _ => {}
        }
    }

    fn collect_entry(&mut self, key: &str, value: &Value) {
        if key == "@vocab" {
            if let Some(vocab) = value.as_str() {
                self.vocab = Some(vocab.to_string());
            }
            return;
        }
        if key.starts_with('@') {
            return;
        }

        match value {
            Value::String(s) => {
                // Keyword aliases and prefix declarations are not term
                // rewrites; prefixes were collected in the first pass
                if s.starts_with('@') || is_prefix_uri(s) {
                    return;
                }
                let iri = self.resolve_compact(s);
                self.terms.insert(key.to_string(), iri);
            }
            Value::Object(obj) => {
                if let Some(id) = obj.get("@id").and_then(Value::as_str) {
                    let iri = self.resolve_compact(id);
                    self.terms.insert(key.to_string(), iri);
                }
            }
            _ => {}
        }
    }

    /// Resolve a possibly-compact IRI (`dc:title`) through the prefix map
    fn resolve_compact(&self, value: &str) -> String {
        if let Some((prefix, rest)) = value.split_once(':') {
            if let Some(uri) = self.prefixes.get(prefix) {
                return format!("{}{}", uri, rest);
            }
        }
        value.to_string()
    }

    /// Expand a key or `@type` term to an absolute IRI, or `None` to leave
    /// it unchanged.
    ///
    /// Terms containing a colon are compact or absolute IRIs and never fall
    /// through to `@vocab`; already-absolute IRIs pass untouched, which
    /// keeps repeated expansion passes stable.
    fn expand_term(&self, term: &str) -> Option<String> {
        if term.starts_with('@') || term.contains("://") {
            return None;
        }
        if let Some(iri) = self.terms.get(term) {
            return Some(iri.clone());
        }
        if let Some((prefix, rest)) = term.split_once(':') {
            return self
                .prefixes
                .get(prefix)
                .map(|uri| format!("{}{}", uri, rest));
        }
        self.vocab.as_ref().map(|vocab| format!("{}{}", vocab, term))
    }
}

fn is_prefix_uri(uri: &str) -> bool {
    uri.ends_with('#') || uri.ends_with('/')
}

/// Resolve an `@id` value against the base IRI.
///
/// Absolute identifiers pass through unchanged. Relative identifiers join
/// the base per RFC 3986 (so a branch URL ending in `metadata.json` resolves
/// siblings correctly); with the relative `./` marker as base they stay
/// relative.
fn resolve_reference(id: &str, base_iri: &str) -> String {
    if Url::parse(id).is_ok() {
        return id.to_string();
    }
    match Url::parse(base_iri) {
        Ok(base) => base
            .join(id)
            .map(|joined| joined.to_string())
            .unwrap_or_else(|_| id.to_string()),
        // Relative marker or otherwise non-absolute base: leave as-is
        Err(_) => id.to_string(),
    }
}

/// Apply one expansion pass over a metadata tree
pub fn expand(tree: &Value, base_iri: &str, unit: &ContextUnit) -> Value {
    let terms = TermMap::from_unit(unit);
    expand_value(tree, base_iri, &terms)
}

/// Apply every context unit in order, each pass consuming the previous
/// pass's output.
///
/// With no units at all, a single pass with an empty context still runs so
/// `@id` values are resolved against the base IRI.
pub fn expand_all(tree: &Value, base_iri: &str, units: &[ContextUnit]) -> Value {
    if units.is_empty() {
        let empty = ContextUnit {
            context: Value::Object(Map::new()),
        };
        return expand(tree, base_iri, &empty);
    }
    units
        .iter()
        .fold(tree.clone(), |acc, unit| expand(&acc, base_iri, unit))
}

fn expand_value(value: &Value, base_iri: &str, terms: &TermMap) -> Value {
    match value {
        Value::Object(entries) => {
            let mut expanded = Map::with_capacity(entries.len());
            for (key, v) in entries {
                let new_key = terms.expand_term(key).unwrap_or_else(|| key.clone());
                let new_value = match (key.as_str(), v) {
                    ("@id", Value::String(id)) => {
                        Value::String(resolve_reference(id, base_iri))
                    }
                    ("@type", v) => expand_types(v, terms),
                    (_, v) => expand_value(v, base_iri, terms),
                };
                expanded.insert(new_key, new_value);
            }
            Value::Object(expanded)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| expand_value(item, base_iri, terms))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// `@type` values expand through the term map like keys do
fn expand_types(value: &Value, terms: &TermMap) -> Value {
    match value {
        Value::String(t) => {
            Value::String(terms.expand_term(t).unwrap_or_else(|| t.clone()))
        }
        Value::Array(types) => Value::Array(
            types.iter().map(|t| expand_types(t, terms)).collect(),
        ),
        other => other.clone(),
    }
}
