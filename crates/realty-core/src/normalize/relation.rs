use serde_json::Value;

use super::{BaseUrl, normalize_entity_map};

/// Normalize a relation field, mirroring its cardinality.
///
/// `{data: {id, ...}}` becomes one entity, `{data: [...]}` a list of them,
/// `{data: null}` becomes `null`. Anything else is returned unchanged, so
/// this is safe to apply to values that may already be normalized.
pub fn normalize_relation(value: &Value, base: &BaseUrl) -> Value {
    let Some(map) = value.as_object() else {
        return value.clone();
    };

    match map.get("data") {
        Some(Value::Null) => Value::Null,
        Some(Value::Array(entities)) => Value::Array(
            entities
                .iter()
                .map(|entity| match entity {
                    Value::Object(entity) => normalize_entity_map(entity, base),
                    other => other.clone(),
                })
                .collect(),
        ),
        Some(Value::Object(entity)) => normalize_entity_map(entity, base),
        _ => value.clone(),
    }
}
