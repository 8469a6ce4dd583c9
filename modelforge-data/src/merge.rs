//! Deep merging of extras documents into base model documents.

use serde_json::Value;

/// Deeply merge `extra` into `base`, overriding existing keys in the base.
///
/// For every key of `extra`: if the key maps to an object on both sides the
/// two objects are merged recursively; otherwise the extra value replaces the
/// base value. Arrays are never merged element-wise, they are replaced
/// wholesale. Keys new to the base are appended, so the base's key order is
/// preserved.
pub fn deep_merge(base: &mut Value, extra: &Value) {
    let Some(extra_map) = extra.as_object() else {
        return;
    };
    let Some(base_map) = base.as_object_mut() else {
        return;
    };

    for (key, extra_value) in extra_map {
        match base_map.get_mut(key) {
            Some(base_value) if base_value.is_object() && extra_value.is_object() => {
                deep_merge(base_value, extra_value);
            }
            _ => {
                base_map.insert(key.clone(), extra_value.clone());
            }
        }
    }
}

/// Apply one extras document to a model.
///
/// Only the `"merge"` subtree of an extras document carries overlay data; an
/// extras document without one is a no-op.
pub(crate) fn apply_extras(model: &mut Value, extras: &Value) {
    if let Some(overlay) = extras.get("merge") {
        deep_merge(model, overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_scalar_keys() {
        let mut base = json!({"a": 1, "b": 2});
        deep_merge(&mut base, &json!({"b": 3}));
        assert_eq!(base, json!({"a": 1, "b": 3}));
    }

    #[test]
    fn merges_nested_objects_recursively() {
        let mut base = json!({"operations": {"Describe": {"http": "GET"}, "Create": {}}});
        let extra = json!({"operations": {"Describe": {"paginated": true}}});

        deep_merge(&mut base, &extra);

        assert_eq!(
            base,
            json!({"operations": {
                "Describe": {"http": "GET", "paginated": true},
                "Create": {}
            }})
        );
    }

    #[test]
    fn arrays_are_replaced_wholesale() {
        let mut base = json!({"a": [1, 2]});
        deep_merge(&mut base, &json!({"a": [3]}));
        assert_eq!(base, json!({"a": [3]}));
    }

    #[test]
    fn object_replaces_non_object_and_vice_versa() {
        let mut base = json!({"a": {"nested": true}, "b": 7});
        deep_merge(&mut base, &json!({"a": "flat", "b": {"nested": true}}));
        assert_eq!(base, json!({"a": "flat", "b": {"nested": true}}));
    }

    #[test]
    fn merge_is_idempotent_when_reapplied() {
        let mut base = json!({"a": {"x": 1, "y": [1, 2]}, "b": "keep"});
        let extra = json!({"a": {"y": [9], "z": 3}, "c": null});

        deep_merge(&mut base, &extra);
        let once = base.clone();
        deep_merge(&mut base, &extra);

        assert_eq!(base, once);
    }

    #[test]
    fn new_keys_append_after_existing_ones() {
        let mut base = json!({"zebra": 1, "apple": 2});
        deep_merge(&mut base, &json!({"mango": 3}));

        let keys: Vec<&str> = base.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn apply_extras_uses_only_the_merge_subtree() {
        let mut model = json!({"metadata": {"protocol": "query"}});
        let extras = json!({"merge": {"metadata": {"protocol": "json"}}, "ignored": {"metadata": {}}});

        apply_extras(&mut model, &extras);

        assert_eq!(model, json!({"metadata": {"protocol": "json"}}));
    }

    #[test]
    fn apply_extras_without_merge_key_is_a_noop() {
        let mut model = json!({"metadata": {}});
        apply_extras(&mut model, &json!({"documentation": "nothing to overlay"}));
        assert_eq!(model, json!({"metadata": {}}));
    }
}
