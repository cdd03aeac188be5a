use serde_json::{Map, Value};

use super::object::normalize_field;
use super::{BaseUrl, entity_fields, normalize_media, stringify_id, truthy};
use crate::model::Block;

/// Normalize one dynamic-zone block.
///
/// A block already in internal shape (string `id`, non-empty
/// `__component`, no `attributes`/`data` wrapper) is returned unchanged,
/// so normalizing twice is a no-op.
pub fn normalize_block(block: &Value, base: &BaseUrl) -> Block {
    Block::from_value(normalize_block_value(block, base))
}

/// Normalize a raw block list; non-arrays yield no blocks.
pub fn normalize_blocks(blocks: &Value, base: &BaseUrl) -> Vec<Block> {
    blocks
        .as_array()
        .map(|items| items.iter().map(|b| normalize_block(b, base)).collect())
        .unwrap_or_default()
}

pub(crate) fn normalize_block_value(block: &Value, base: &BaseUrl) -> Value {
    let Some(map) = block.as_object() else {
        return block.clone();
    };
    if is_internal_shape(map) {
        return block.clone();
    }

    let fields = entity_fields(map);
    let id = map
        .get("id")
        .filter(|id| truthy(id))
        .or_else(|| map.get("data").and_then(|d| d.get("id")))
        .filter(|id| truthy(id));
    let component = [map.get("__component"), fields.get("__component")]
        .into_iter()
        .flatten()
        .find_map(|c| c.as_str().filter(|s| !s.is_empty()))
        .unwrap_or_default();

    let mut out = Map::with_capacity(fields.len() + 2);
    out.insert("id".into(), Value::String(stringify_id(id)));
    out.insert("__component".into(), Value::String(component.to_owned()));

    for (key, value) in fields {
        if key == "id" || key == "__component" {
            continue;
        }
        if key == "image" {
            if let Some(image) = resolve_image(value, base) {
                out.insert(key.clone(), image);
                continue;
            }
        }
        out.insert(key.clone(), normalize_field(key, value, base));
    }

    Value::Object(out)
}

fn is_internal_shape(map: &Map<String, Value>) -> bool {
    let has_component = map
        .get("__component")
        .and_then(Value::as_str)
        .is_some_and(|c| !c.is_empty());
    let unwrapped = !map.get("attributes").is_some_and(truthy) && !map.get("data").is_some_and(truthy);
    let string_id = map.get("id").is_none_or(Value::is_string);
    has_component && unwrapped && string_id
}

/// Media-first resolution for a block's `image` field.
fn resolve_image(value: &Value, base: &BaseUrl) -> Option<Value> {
    let resolved = match value {
        Value::String(path) if path.starts_with('/') => normalize_media(value, base).map(|m| m.to_value()),
        Value::Object(map)
            if map.get("url").is_some_and(Value::is_string)
                || map.contains_key("data")
                || map.contains_key("attributes") =>
        {
            normalize_media(value, base).map(|m| m.to_value())
        }
        Value::Object(_) | Value::Array(_) => Some(normalize_field("image", value, base)),
        _ => None,
    };
    resolved.filter(truthy)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::BlockKind;

    fn base() -> BaseUrl {
        BaseUrl::new("http://cms.local")
    }

    #[test]
    fn internal_shape_is_untouched() {
        let block = json!({
            "id": "hero-1",
            "__component": "blocks.hero",
            "title": "Welcome",
            "image": { "url": "/relative-on-purpose.png" },
        });
        assert_eq!(normalize_block_value(&block, &base()), block);
    }

    #[test]
    fn normalizing_twice_is_a_noop() {
        let raw = json!({
            "id": 5,
            "__component": "blocks.features",
            "title": "Why us",
            "features": [
                { "id": 1, "title": "Fast", "icon": { "name": "bolt" } },
                { "id": 2, "title": "Local", "icon": { "data": { "attributes": { "name": "pin" } } } },
            ],
        });
        let once = normalize_block(&raw, &base());
        let twice = normalize_block(&once.to_value(), &base());
        assert_eq!(once, twice);
        assert_eq!(once.id, "5");
        assert_eq!(once.field("features").unwrap()[1]["icon"], "pin");
    }

    #[test]
    fn attributes_wrapper_is_unwrapped() {
        let raw = json!({
            "id": 7,
            "attributes": {
                "__component": "blocks.cta",
                "heading": "Talk to us",
                "button": { "text": "Contact", "url": "/contact" },
            },
        });
        let block = normalize_block(&raw, &base());
        assert_eq!(block.kind(), BlockKind::Cta);
        assert_eq!(block.id, "7");
        assert_eq!(block.field("heading").unwrap(), "Talk to us");
    }

    #[test]
    fn id_falls_back_to_data_id() {
        let raw = json!({ "__component": "blocks.content", "data": { "id": 11 } });
        assert_eq!(normalize_block(&raw, &base()).id, "11");
    }

    #[test]
    fn image_is_resolved_media_first() {
        let cases = [
            json!("/hero.png"),
            json!({ "url": "/hero.png" }),
            json!({ "data": { "attributes": { "url": "/hero.png" } } }),
            json!({ "attributes": { "url": "/hero.png" } }),
            json!([{ "url": "/hero.png" }]),
        ];
        for image in cases {
            let raw = json!({ "id": 1, "__component": "blocks.hero", "image": image });
            let block = normalize_block(&raw, &base());
            assert_eq!(
                block.field("image").unwrap(),
                &json!({ "url": "http://cms.local/hero.png" }),
                "{image}"
            );
        }
    }

    #[test]
    fn unresolvable_image_falls_back_to_generic_rules() {
        let raw = json!({ "id": 1, "__component": "blocks.hero", "image": { "data": null } });
        let block = normalize_block(&raw, &base());
        assert_eq!(block.field("image").unwrap(), &Value::Null);
    }

    #[test]
    fn missing_component_and_id_become_empty_strings() {
        let block = normalize_block(&json!({ "title": "orphan" }), &base());
        assert_eq!(block.id, "");
        assert_eq!(block.component, "");
        assert!(!block.kind().is_known());
    }

    #[test]
    fn non_array_block_list_is_empty() {
        assert!(normalize_blocks(&json!({ "not": "a list" }), &base()).is_empty());
        assert_eq!(normalize_blocks(&json!([{ "id": "a", "__component": "blocks.team" }]), &base()).len(), 1);
    }
}
