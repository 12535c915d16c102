//! Draft / baseline structural equality.
//!
//! Drafts are compared through their serde-JSON image so every section shares one
//! implementation. Individual paths can override the comparison, e.g. id sets whose
//! order carries no meaning.

use serde::Serialize;
use serde_json::Value;

/// Comparison applied at a dot-path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldComparison {
    /// Arrays compare element by element (the default)
    Ordered,
    /// Arrays compare as multisets
    Unordered,
    /// Strings compare after trimming surrounding whitespace
    TrimmedText,
}

/// Per-path overrides, keyed by dot-path (`checkInOut.checkoutId`).
/// Array elements extend the path with `[]`.
pub type ComparatorOverrides = [(&'static str, FieldComparison)];

/// Compare two JSON values honoring per-path overrides
#[must_use]
pub fn deep_equal(a: &Value, b: &Value, overrides: &ComparatorOverrides) -> bool {
    eq_at("", a, b, overrides)
}

/// Compare two serializable drafts; unserializable drafts count as different
#[must_use]
pub fn draft_equal<T: Serialize>(a: &T, b: &T, overrides: &ComparatorOverrides) -> bool {
    match (serde_json::to_value(a), serde_json::to_value(b)) {
        (Ok(a), Ok(b)) => deep_equal(&a, &b, overrides),
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("Draft comparison failed to serialize: {e}");
            false
        }
    }
}

fn comparison_for(path: &str, overrides: &ComparatorOverrides) -> FieldComparison {
    overrides
        .iter()
        .find(|(p, _)| *p == path)
        .map_or(FieldComparison::Ordered, |(_, c)| *c)
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn eq_at(path: &str, a: &Value, b: &Value, overrides: &ComparatorOverrides) -> bool {
    match (comparison_for(path, overrides), a, b) {
        (FieldComparison::Unordered, Value::Array(x), Value::Array(y)) => {
            unordered_eq(path, x, y, overrides)
        }
        (FieldComparison::TrimmedText, Value::String(x), Value::String(y)) => x.trim() == y.trim(),
        _ => structural_eq(path, a, b, overrides),
    }
}

fn structural_eq(path: &str, a: &Value, b: &Value, overrides: &ComparatorOverrides) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| {
                    y.get(k)
                        .is_some_and(|w| eq_at(&child_path(path, k), v, w, overrides))
                })
        }
        (Value::Array(x), Value::Array(y)) => {
            let element = format!("{path}[]");
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|(v, w)| eq_at(&element, v, w, overrides))
        }
        _ => a == b,
    }
}

fn unordered_eq(path: &str, x: &[Value], y: &[Value], overrides: &ComparatorOverrides) -> bool {
    if x.len() != y.len() {
        return false;
    }
    let element = format!("{path}[]");
    let mut used = vec![false; y.len()];
    x.iter().all(|v| {
        let found = y
            .iter()
            .enumerate()
            .find(|(i, w)| !used[*i] && eq_at(&element, v, w, overrides))
            .map(|(i, _)| i);
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
