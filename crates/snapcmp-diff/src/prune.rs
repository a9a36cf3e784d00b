//! Deep-prune: recursive removal of empty containers from a JSON value.

use serde_json::{Map, Value};

/// Remove empty objects, empty arrays and nulls from `value`, bottom-up.
///
/// Returns `None` when the value itself reduces to nothing. An object whose
/// members all prune away is itself pruned, and so on up the tree. Non-null
/// scalars are kept unchanged.
pub fn deep_prune(value: Value) -> Option<Value> {
    match value {
        Value::Object(members) => {
            let kept: Map<String, Value> = members
                .into_iter()
                .filter_map(|(key, v)| deep_prune(v).map(|v| (key, v)))
                .collect();
            (!kept.is_empty()).then_some(Value::Object(kept))
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items.into_iter().filter_map(deep_prune).collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        Value::Null => None,
        scalar => Some(scalar),
    }
}
