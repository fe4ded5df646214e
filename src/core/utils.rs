//! String transformation utilities shared by the import pipeline and the
//! code generators.
//!
//! Handler names and endpoint ids start from the same normalization:
//! replace everything outside `[A-Za-z0-9]` with a separator, then
//! case-fold per target-language convention.

/// Converts a string to snake_case.
///
/// Handles camelCase, PascalCase, kebab-case, and space- or slash-separated
/// input; consecutive separators collapse to a single underscore.
///
/// # Examples
/// ```
/// use mcpforge::core::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
/// assert_eq!(to_snake_case("/widgets/{id}"), "widgets_id");
/// assert_eq!(to_snake_case("tool-routes"), "tool_routes");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_lower = false;
    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Converts a string to PascalCase, normalizing through snake_case first.
///
/// # Examples
/// ```
/// use mcpforge::core::utils::to_pascal_case;
///
/// assert_eq!(to_pascal_case("get_widgets"), "GetWidgets");
/// assert_eq!(to_pascal_case("/widgets/{id}"), "WidgetsId");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect()
}

/// Derives the stable endpoint id from a method and a path: the two joined
/// with `-`, with every non-alphanumeric character replaced by `-`.
///
/// # Examples
/// ```
/// use mcpforge::core::utils::endpoint_id;
///
/// assert_eq!(endpoint_id("GET", "/widgets"), "GET--widgets");
/// assert_eq!(endpoint_id("POST", "/widgets/{id}"), "POST--widgets--id-");
/// ```
pub fn endpoint_id(method: &str, path: &str) -> String {
    format!("{method}-{path}")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
