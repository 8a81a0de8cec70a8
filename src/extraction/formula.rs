//! Human-readable pivot formulas.
//!
//! A pivot "values" item stores its formula with opaque placeholders such as
//! `[3A1C2-B4E]`, and a `context` object mapping each placeholder to the
//! measure it stands for. Expansion substitutes the measure titles back in.

use serde_json::{Map, Value};

/// Replace every occurrence of each context key in `formula` with that
/// entry's `title`.
///
/// Keys are applied in document order with plain substring replacement, so
/// a key that is a substring of a later key can rewrite part of it first.
/// An entry without a usable title substitutes the key itself. Empty keys
/// are skipped.
pub fn expand_formula(formula: &str, context: &Map<String, Value>) -> String {
    context
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .fold(formula.to_string(), |expanded, (key, entry)| {
            let title = entry
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .unwrap_or(key);
            expanded.replace(key.as_str(), title)
        })
}
