//! JSON-path-style selector evaluation for body sources.
//!
//! The supported grammar is deliberately small: dot-separated member
//! names rooted at `$`, with `[N]` array indexing, e.g. `$.user.id` or
//! `$.items[0].sku`. The literal selectors `$` and `.` return the entire
//! document as text (used for debugging/audit capture). A missing path
//! yields `None`, never an error.

use serde_json::Value;

/// Resolves a selector against a parsed document.
#[must_use]
pub fn select<'a>(document: &'a Value, selector: &str) -> Option<&'a Value> {
    if selector == "$" || selector == "." {
        return Some(document);
    }

    let path = selector.strip_prefix("$.").or_else(|| selector.strip_prefix('.'))?;

    let mut current = document;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        let (name, indexes) = parse_segment(segment)?;
        if !name.is_empty() {
            current = current.get(name)?;
        }
        for index in indexes {
            current = current.get(index)?;
        }
    }
    Some(current)
}

/// Resolves a selector and renders the result as text.
///
/// Strings render unquoted; numbers and booleans render via their JSON
/// form; objects and arrays render as compact JSON. `null` (and any
/// missing path) is absent.
#[must_use]
pub fn select_text(document: &Value, selector: &str) -> Option<String> {
    match select(document, selector)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        container => serde_json::to_string(container).ok(),
    }
}

/// Splits `items[0][1]` into `("items", [0, 1])`.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(bracket) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };

    let name = &segment[..bracket];
    let mut indexes = Vec::new();
    let mut rest = &segment[bracket..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let close = stripped.find(']')?;
        let index: usize = stripped[..close].parse().ok()?;
        indexes.push(index);
        rest = &stripped[close + 1..];
    }
    if !rest.is_empty() {
        return None;
    }
    Some((name, indexes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_access() {
        let doc = json!({"user": {"id": "42", "name": "Alice"}});
        assert_eq!(select_text(&doc, "$.user.id").as_deref(), Some("42"));
        assert_eq!(select_text(&doc, "$.user.name").as_deref(), Some("Alice"));
    }

    #[test]
    fn test_missing_path_is_absent() {
        let doc = json!({"user": {"id": "42"}});
        assert_eq!(select_text(&doc, "$.user.missing"), None);
        assert_eq!(select_text(&doc, "$.other.deep.path"), None);
    }

    #[test]
    fn test_whole_document() {
        let doc = json!({"a": 1});
        assert_eq!(select_text(&doc, "$").as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(select_text(&doc, ".").as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_array_indexing() {
        let doc = json!({"items": [{"sku": "A-1"}, {"sku": "B-2"}]});
        assert_eq!(select_text(&doc, "$.items[0].sku").as_deref(), Some("A-1"));
        assert_eq!(select_text(&doc, "$.items[1].sku").as_deref(), Some("B-2"));
        assert_eq!(select_text(&doc, "$.items[2].sku"), None);
    }

    #[test]
    fn test_nested_array_indexing() {
        let doc = json!({"grid": [[1, 2], [3, 4]]});
        assert_eq!(select_text(&doc, "$.grid[1][0]").as_deref(), Some("3"));
    }

    #[test]
    fn test_scalar_rendering() {
        let doc = json!({"count": 7, "active": true, "ratio": 0.5, "none": null});
        assert_eq!(select_text(&doc, "$.count").as_deref(), Some("7"));
        assert_eq!(select_text(&doc, "$.active").as_deref(), Some("true"));
        assert_eq!(select_text(&doc, "$.ratio").as_deref(), Some("0.5"));
        assert_eq!(select_text(&doc, "$.none"), None);
    }

    #[test]
    fn test_container_rendering() {
        let doc = json!({"user": {"id": "42"}});
        assert_eq!(
            select_text(&doc, "$.user").as_deref(),
            Some(r#"{"id":"42"}"#)
        );
    }

    #[test]
    fn test_dot_prefixed_selector() {
        let doc = json!({"user": {"id": "42"}});
        assert_eq!(select_text(&doc, ".user.id").as_deref(), Some("42"));
    }

    #[test]
    fn test_malformed_selectors_are_absent() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(select_text(&doc, "a.b"), None);
        assert_eq!(select_text(&doc, "$.a..b"), None);
        assert_eq!(select_text(&doc, "$.a[x]"), None);
        assert_eq!(select_text(&doc, "$.a[0"), None);
    }
}
