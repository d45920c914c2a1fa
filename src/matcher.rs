use serde_json::Value;

/// Structural deep equality between two JSON values.
///
/// Two objects are equal when their field-name sets match (same cardinality,
/// same members) and every shared field compares deep-equal. Arrays are
/// traversed the same generic way, field by positional field. Any pairing
/// involving a primitive (or two values of different kinds) compares by
/// value directly.
///
/// Values are assumed to be finite trees; there is no cycle detection.
/// `serde_json::Value` cannot form cycles, but very deep nesting will
/// recurse proportionally.
///
/// # Example
///
/// ```rust
/// use session_store::deep_equal;
/// use serde_json::json;
///
/// assert!(deep_equal(
///     &json!({ "a": 1, "b": [1, 2] }),
///     &json!({ "b": [1, 2], "a": 1 }),
/// ));
/// assert!(!deep_equal(&json!({ "a": 1 }), &json!({ "a": 2 })));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, va)| b.get(key).is_some_and(|vb| deep_equal(va, vb)))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(va, vb)| deep_equal(va, vb))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives_compare_by_value() {
        assert!(deep_equal(&json!(10), &json!(10)));
        assert!(deep_equal(&json!("abc"), &json!("abc")));
        assert!(deep_equal(&json!(true), &json!(true)));
        assert!(deep_equal(&Value::Null, &Value::Null));

        assert!(!deep_equal(&json!(10), &json!(11)));
        assert!(!deep_equal(&json!("abc"), &json!("abd")));
        assert!(!deep_equal(&json!(0), &json!(false)));
    }

    #[test]
    fn test_primitive_never_equals_structured() {
        assert!(!deep_equal(&json!({}), &json!(5)));
        assert!(!deep_equal(&json!(5), &json!({})));
        assert!(!deep_equal(&json!([]), &Value::Null));
    }

    #[test]
    fn test_object_field_sets_must_match() {
        assert!(deep_equal(
            &json!({ "a": 1, "b": 2 }),
            &json!({ "b": 2, "a": 1 }),
        ));
        // Missing field
        assert!(!deep_equal(&json!({ "a": 1, "b": 2 }), &json!({ "a": 1 })));
        // Same cardinality, different membership
        assert!(!deep_equal(&json!({ "a": 1 }), &json!({ "b": 1 })));
    }

    #[test]
    fn test_nested_mismatch_propagates() {
        let a = json!({ "user": { "name": "ana", "tags": ["x", "y"] } });
        let b = json!({ "user": { "name": "ana", "tags": ["x", "z"] } });
        assert!(deep_equal(&a, &a));
        assert!(!deep_equal(&a, &b));
    }

    #[test]
    fn test_arrays_compare_positionally() {
        assert!(deep_equal(&json!([1, 2, 3]), &json!([1, 2, 3])));
        assert!(!deep_equal(&json!([1, 2, 3]), &json!([3, 2, 1])));
        assert!(!deep_equal(&json!([1, 2, 3]), &json!([1, 2])));
        assert!(!deep_equal(&json!([1, 2]), &json!({ "0": 1, "1": 2 })));
    }

    #[test]
    fn test_reflexive_and_symmetric() {
        let values = [
            json!(10),
            json!("s"),
            json!([1, [2, { "k": null }]]),
            json!({ "a": { "b": [true, 1.5] } }),
        ];
        for v in &values {
            assert!(deep_equal(v, v));
        }
        for a in &values {
            for b in &values {
                assert_eq!(deep_equal(a, b), deep_equal(b, a));
            }
        }
    }
}
