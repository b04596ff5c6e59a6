//! Context resolution for JSON-LD metadata
//!
//! A metadata document's `@context` is a URL, an inline mapping, or an array
//! mixing both. The resolver fetches external contexts and normalizes the
//! whole value into an ordered sequence of units, each applied as one
//! expansion pass.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{KoError, Result};

/// Fetch attempts per context URL
const MAX_ATTEMPTS: usize = 2;

/// One normalized element of a `@context` value, ready for a single
/// expansion pass
#[derive(Debug, Clone)]
pub struct ContextUnit {
    pub context: Value,
}

impl ContextUnit {
    fn new(context: Value) -> Self {
        Self { context }
    }
}

/// Resolves `@context` values, fetching and caching external contexts.
///
/// Fetches are sequential and a failure is fatal to the run; there is no
/// fallback context. Responses are cached by URL so repeated references to
/// the same context are fetched once.
pub struct ContextResolver {
    client: reqwest::blocking::Client,
    cache: HashMap<String, Value>,
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            cache: HashMap::new(),
        }
    }

    /// Normalize the `@context` of a metadata document into ordered units.
    ///
    /// A document without `@context` yields no units (expansion becomes a
    /// no-op apart from base-IRI resolution handled elsewhere).
    pub fn normalize_document(&mut self, metadata: &Value) -> Result<Vec<ContextUnit>> {
        match metadata.get("@context") {
            Some(context) => self.normalize(context),
            None => Ok(Vec::new()),
        }
    }

    /// Normalize a raw `@context` value into ordered units
    pub fn normalize(&mut self, context: &Value) -> Result<Vec<ContextUnit>> {
        match context {
            // External reference: the fetched document is the effective context
            Value::String(url) => {
                let fetched = self.fetch(url)?;
                Ok(vec![ContextUnit::new(fetched)])
            }
            // Inline mapping passes through unchanged
            Value::Object(_) => Ok(vec![ContextUnit::new(context.clone())]),
            // Each element becomes an independent unit, in order
            Value::Array(items) => {
                let mut units = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(url) => units.push(ContextUnit::new(self.fetch(url)?)),
                        other => units.push(ContextUnit::new(other.clone())),
                    }
                }
                Ok(units)
            }
            other => Err(KoError::InvalidMetadata(format!(
                "@context must be a string, object, or array, got: {}",
                other
            ))),
        }
    }

    /// Fetch an external context document, expecting a JSON body.
    ///
    /// Consults the cache first; on a miss, tries the network up to
    /// [`MAX_ATTEMPTS`] times before giving up.
    fn fetch(&mut self, url: &str) -> Result<Value> {
        if let Some(cached) = self.cache.get(url) {
            return Ok(cached.clone());
        }

        let mut last_error = String::new();
        for _ in 0..MAX_ATTEMPTS {
            match self.fetch_once(url) {
                Ok(document) => {
                    self.cache.insert(url.to_string(), document.clone());
                    return Ok(document);
                }
                Err(reason) => last_error = reason,
            }
        }

        Err(KoError::ContextFetch {
            url: url.to_string(),
            reason: last_error,
        })
    }

    fn fetch_once(&self, url: &str) -> std::result::Result<Value, String> {
        self.client
            .get(url)
            .header("Accept", "application/ld+json")
            .send()
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?
            .json::<Value>()
            .map_err(|e| format!("response is not valid JSON: {}", e))
    }

    #[cfg(test)]
    fn insert_cached(&mut self, url: &str, document: Value) {
        self.cache.insert(url.to_string(), document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_inline_object() {
        let mut resolver = ContextResolver::new();
        let context = json!({"dc": "http://purl.org/dc/elements/1.1/"});

        let units = resolver.normalize(&context).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].context, context);
    }

    #[test]
    fn test_normalize_array_preserves_order() {
        let mut resolver = ContextResolver::new();
        let first = json!({"dc": "http://purl.org/dc/elements/1.1/"});
        let second = json!({"schema": "http://schema.org/"});

        let units = resolver
            .normalize(&json!([first.clone(), second.clone()]))
            .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].context, first);
        assert_eq!(units[1].context, second);
    }

    #[test]
    fn test_normalize_string_uses_cache() {
        let mut resolver = ContextResolver::new();
        let document = json!({"@context": {"dc": "http://purl.org/dc/elements/1.1/"}});
        // An unfetchable URL, satisfied entirely from the cache
        resolver.insert_cached("https://nonexistent.invalid/context", document.clone());

        let units = resolver
            .normalize(&json!("https://nonexistent.invalid/context"))
            .unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].context, document);
    }

    #[test]
    fn test_normalize_array_with_cached_url() {
        let mut resolver = ContextResolver::new();
        let remote = json!({"@context": {"koio": "https://kgrid.org/koio#"}});
        resolver.insert_cached("https://nonexistent.invalid/koio", remote.clone());

        let units = resolver
            .normalize(&json!([
                "https://nonexistent.invalid/koio",
                {"dc": "http://purl.org/dc/elements/1.1/"}
            ]))
            .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].context, remote);
        assert_eq!(units[1].context, json!({"dc": "http://purl.org/dc/elements/1.1/"}));
    }

    #[test]
    fn test_normalize_missing_context() {
        let mut resolver = ContextResolver::new();
        let units = resolver
            .normalize_document(&json!({"@id": "ko"}))
            .unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_normalize_rejects_invalid_shape() {
        let mut resolver = ContextResolver::new();
        let result = resolver.normalize(&json!(42));
        assert!(matches!(result, Err(KoError::InvalidMetadata(_))));
    }

    #[test]
    fn test_fetch_failure_is_fatal() {
        let mut resolver = ContextResolver::new();
        let result = resolver.normalize(&json!("http://127.0.0.1:1/context"));
        assert!(matches!(result, Err(KoError::ContextFetch { .. })));
    }

    // Network integration test (requires internet access)
    #[test]
    #[ignore]
    fn test_fetch_schema_org_context() {
        let mut resolver = ContextResolver::new();
        let units = resolver
            .normalize(&json!("https://schema.org/docs/jsonldcontext.json"))
            .unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].context.get("@context").is_some());
    }
}
