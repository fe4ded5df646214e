//! Placeholder substitution.
//!
//! Templates contain `{{ dotted.path }}` placeholders resolved against a
//! dynamic JSON context. There are no loops, conditionals, includes, or
//! escaping: repeated fragments are pre-rendered by the caller and passed
//! in as a single string value.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_][A-Za-z0-9_.\-]*)\s*\}\}")
        .expect("placeholder regex must compile")
});

/// Walks a dot-separated path into the context. Array elements are
/// addressable by numeric segment.
fn resolve<'a>(context: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = context;
    for segment in path.split('.') {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        // An explicit null is a present value and renders as text; only a
        // *missing* path leaves the placeholder untouched.
        JsonValue::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Replaces every resolvable placeholder. Unresolved placeholders stay in
/// the output verbatim; a miss is not an error.
pub fn render(template: &str, context: &JsonValue) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            match resolve(context, &caps[1]) {
                Some(value) => render_value(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// The distinct placeholder paths a template references, in order of first
/// appearance. Used to check templates against their declared key manifests
/// at registration time.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let key = caps[1].to_string();
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}
