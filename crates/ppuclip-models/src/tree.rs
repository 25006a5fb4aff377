//! Tolerant search over schema-less JSON trees.
//!
//! The metadata and playback APIs have no stable published shape; fields move
//! between nesting levels across site releases. Instead of deserializing into
//! structs, callers keep the body as a [`serde_json::Value`] and search it.
//! Traversal follows object insertion order (`serde_json` is built with
//! `preserve_order`), so ties always break toward the earliest occurrence in
//! the document.

use serde_json::Value;

/// Depth-first search for the first value stored under `key`.
///
/// At an object, an own entry wins before any descendant; member values are
/// then visited in insertion order, array elements in order. Entries holding
/// `null` or an empty string are treated as absent and the search continues.
pub fn find_first<'v>(tree: &'v Value, key: &str) -> Option<&'v Value> {
    match tree {
        Value::Object(map) => {
            if let Some(own) = map.get(key).filter(|v| is_present(v)) {
                return Some(own);
            }
            map.values().find_map(|child| find_first(child, key))
        }
        Value::Array(items) => items.iter().find_map(|child| find_first(child, key)),
        _ => None,
    }
}

/// Every string in the tree containing `marker`, in depth-first insertion
/// order.
pub fn collect_strings_containing<'v>(tree: &'v Value, marker: &str) -> Vec<&'v str> {
    let mut found = Vec::new();
    collect_into(tree, marker, &mut found);
    found
}

/// Convenience over [`find_first`] for string-valued fields.
pub fn string_at<'v>(tree: &'v Value, key: &str) -> Option<&'v str> {
    find_first(tree, key).and_then(Value::as_str)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn collect_into<'v>(tree: &'v Value, marker: &str, found: &mut Vec<&'v str>) {
    match tree {
        Value::String(s) => {
            if s.contains(marker) {
                found.push(s.as_str());
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                collect_into(child, marker, found);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_into(child, marker, found);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn own_key_wins_over_descendant() {
        let tree = json!({
            "nested": { "inKey": "deep" },
            "inKey": "shallow"
        });
        assert_eq!(find_first(&tree, "inKey"), Some(&json!("shallow")));
    }

    #[test]
    fn insertion_order_breaks_ties() {
        let tree = json!({
            "first": { "target": "one" },
            "second": { "target": "two" }
        });
        assert_eq!(find_first(&tree, "target"), Some(&json!("one")));
    }

    #[test]
    fn arrays_are_searched_in_order() {
        let tree = json!([{ "target": null }, { "target": "valid" }]);
        assert_eq!(find_first(&tree, "target"), Some(&json!("valid")));
    }

    #[test]
    fn null_and_empty_values_are_skipped() {
        let tree = json!({
            "target": "",
            "wrap": { "target": "real" }
        });
        assert_eq!(find_first(&tree, "target"), Some(&json!("real")));
    }

    #[test]
    fn absent_key_is_none() {
        let tree = json!({ "a": 1, "b": [2, 3] });
        assert_eq!(find_first(&tree, "target"), None);
        assert_eq!(find_first(&json!(42), "target"), None);
    }

    #[test]
    fn collects_matching_strings_depth_first() {
        let tree = json!({
            "meta": "ignore me",
            "period": [
                { "path": "https://cdn/a.m3u8", "extra": { "path": "https://cdn/b.m3u8" } },
                { "path": "https://cdn/c.mpd" }
            ],
            "fallback": "https://cdn/d.m3u8"
        });
        assert_eq!(
            collect_strings_containing(&tree, ".m3u8"),
            vec!["https://cdn/a.m3u8", "https://cdn/b.m3u8", "https://cdn/d.m3u8"]
        );
    }

    #[test]
    fn string_at_rejects_non_strings() {
        let tree = json!({ "count": 7, "name": "ok" });
        assert_eq!(string_at(&tree, "count"), None);
        assert_eq!(string_at(&tree, "name"), Some("ok"));
    }
}
