//! Slash-delimited property access over the parsed configuration tree
//!
//! The document arrives already parsed as a `serde_json::Value`; the helpers
//! here walk it without ever failing. A missing path resolves to the empty
//! mapping, a missing key to the empty string or `None`, so callers can probe
//! optional parts of the schema freely.

use serde_json::{Map, Value};
use std::sync::OnceLock;

/// The shared empty mapping returned for absent paths.
pub(crate) fn empty() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

/// Walk `node` by a slash-delimited path and return the mapping found there.
///
/// Path `/` returns the node's own mapping. The empty mapping is returned the
/// instant a path token is missing or the walk reaches a non-mapping value.
pub fn properties<'a>(node: &'a Value, path: &str) -> &'a Map<String, Value> {
    let Some(mut current) = node.as_object() else {
        return empty();
    };
    if path != "/" {
        for token in path.trim_start_matches('/').split('/') {
            match current.get(token).and_then(Value::as_object) {
                Some(next) => current = next,
                None => return empty(),
            }
        }
    }
    current
}

/// Scalar property at `path`/`key`, rendered as a string.
///
/// Returns the empty string when the path or key is absent. An absent key and
/// a legitimately empty value are indistinguishable here; use [`value`] when
/// that distinction matters.
pub fn property(node: &Value, path: &str, key: &str) -> String {
    match properties(node, path).get(key) {
        Some(v) => render_scalar(v),
        None => String::new(),
    }
}

/// Raw stored value for `key`, or `None` when the key is missing.
///
/// `None` means "no such key"; `Some` of a falsy value means "key present but
/// empty". Several call sites branch on that difference, so it must not be
/// collapsed.
pub fn value<'a>(mapping: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    mapping.get(key)
}

/// Truthiness in the sense the configuration schema uses: `null`, `false`,
/// zero, the empty string, and empty collections are falsy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render one scalar the way the query surface reports it: strings bare,
/// everything else in its JSON form.
pub fn render_scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Canonical string form of a mapping, used as a grouping and identity key.
///
/// serde_json maps are BTreeMap-backed here (no `preserve_order` feature), so
/// this is recursively key-sorted JSON: two logically equal subtrees render
/// identically no matter how the source document ordered their keys.
pub fn canonical(mapping: &Map<String, Value>) -> String {
    Value::Object(mapping.clone()).to_string()
}
