//! Recursive merge of nested configuration values.

use serde_yaml::Value;

/// Merges `overlay` on top of `base`.
///
/// - Mappings merge per key, recursively. Keys only present in `overlay` are
///   appended after the keys of `base`.
/// - Sequences are unioned: elements of `overlay` not already in `base` are
///   appended.
/// - Anything else in `overlay` (including null) replaces the `base` value.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Mapping(merged)
        }
        (Value::Sequence(base_seq), Value::Sequence(overlay_seq)) => {
            let mut merged = base_seq.clone();
            for item in overlay_seq {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            Value::Sequence(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).expect("valid yaml")
    }

    #[test]
    fn test_disjoint_keys_are_unioned() {
        let merged = deep_merge(&yaml("A: { selected: true }"), &yaml("B: { selected: true }"));
        assert_eq!(merged, yaml("{ A: { selected: true }, B: { selected: true } }"));
    }

    #[test]
    fn test_overlay_wins_on_same_path() {
        let merged = deep_merge(
            &yaml("A: { selected: true, hidden: false }"),
            &yaml("A: { selected: false }"),
        );
        assert_eq!(merged, yaml("A: { selected: false, hidden: false }"));
    }

    #[test]
    fn test_key_order_base_first() {
        let merged = deep_merge(&yaml("{ b: 1, a: 2 }"), &yaml("{ c: 3, b: 4 }"));
        let keys: Vec<_> = merged
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(merged["b"].as_i64(), Some(4));
    }

    #[test]
    fn test_sequences_union() {
        let merged = deep_merge(&yaml("[a, b]"), &yaml("[b, c]"));
        assert_eq!(merged, yaml("[a, b, c]"));
    }

    #[test]
    fn test_scalar_replaces_mapping() {
        let merged = deep_merge(&yaml("A: { selected: true }"), &yaml("A: false"));
        assert_eq!(merged, yaml("A: false"));
    }

    #[test]
    fn test_empty_overlay_keeps_base() {
        let base = yaml("A: { selected: true }");
        assert_eq!(deep_merge(&base, &yaml("{}")), base);
    }
}
