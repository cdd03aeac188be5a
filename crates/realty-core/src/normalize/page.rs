use serde_json::{Map, Value};

use super::block::normalize_block_value;
use super::media::is_absolute;
use super::{BaseUrl, entity_fields, first_entity, normalize_entity_map, normalize_media, str_field, stringify_id, truthy};
use crate::model::{Block, BlockKind, Page};

/// Normalize a page from a single-entity or collection response.
///
/// A collection contributes only its first element. `None` when the
/// response carries no entity.
pub fn normalize_page(response: &Value, base: &BaseUrl) -> Option<Page> {
    first_entity(response).map(|entity| page_from_entity(entity, base))
}

/// Normalize every page of a collection response.
pub fn normalize_pages(response: &Value, base: &BaseUrl) -> Vec<Page> {
    collection_entities(response)
        .map(|entity| page_from_entity(entity, base))
        .collect()
}

/// Generic single-entity normalization: `{id, ...normalized fields}`.
pub fn normalize_entity(response: &Value, base: &BaseUrl) -> Option<Value> {
    first_entity(response).map(|entity| normalize_entity_map(entity, base))
}

/// Generic collection normalization.
pub fn normalize_collection(response: &Value, base: &BaseUrl) -> Vec<Value> {
    collection_entities(response)
        .map(|entity| normalize_entity_map(entity, base))
        .collect()
}

fn collection_entities(response: &Value) -> impl Iterator<Item = &Map<String, Value>> {
    response
        .get("data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn page_from_entity(entity: &Map<String, Value>, base: &BaseUrl) -> Page {
    let fields = entity_fields(entity);

    let blocks = fields
        .get("blocks")
        .and_then(Value::as_array)
        .map(|raw| {
            raw.iter()
                .map(|block| {
                    let mut fixed = fix_image_urls(&normalize_block_value(block, base), base);
                    promote_property_images(&mut fixed, base);
                    Block::from_value(fixed)
                })
                .collect()
        })
        .unwrap_or_default();

    let text = |key: &str| str_field(fields, key).map(str::to_owned);

    Page {
        id: stringify_id(entity.get("id")),
        slug: text("slug").unwrap_or_default(),
        title: text("title").unwrap_or_default(),
        meta_title: text("metaTitle"),
        meta_description: text("metaDescription"),
        blocks,
    }
}

/// Re-absolutize any relative `image`, `avatar` or `images[]` URL left in
/// a normalized tree.
pub fn fix_image_urls(value: &Value, base: &BaseUrl) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| fix_image_urls(v, base)).collect()),
        Value::Object(map) => {
            let mut fixed = Map::with_capacity(map.len());
            for (key, value) in map {
                let out = match key.as_str() {
                    "image" | "avatar" => {
                        absolutize_media_url(value, base).unwrap_or_else(|| fix_image_urls(value, base))
                    }
                    "images" if value.is_array() => Value::Array(
                        value
                            .as_array()
                            .into_iter()
                            .flatten()
                            .map(|img| absolutize_media_url(img, base).unwrap_or_else(|| img.clone()))
                            .collect(),
                    ),
                    _ => fix_image_urls(value, base),
                };
                fixed.insert(key.clone(), out);
            }
            Value::Object(fixed)
        }
        other => other.clone(),
    }
}

/// `Some` with the URL joined to `base` when `value` is `{url: "/..."}`.
fn absolutize_media_url(value: &Value, base: &BaseUrl) -> Option<Value> {
    let map = value.as_object()?;
    let url = str_field(map, "url").filter(|u| u.starts_with('/') && !is_absolute(u))?;
    let mut out = map.clone();
    out.insert("url".into(), Value::String(base.absolutize(url)));
    Some(Value::Object(out))
}

/// Properties-list cards render a single `image`; take the first of
/// `images` when none is set.
fn promote_property_images(block: &mut Value, base: &BaseUrl) {
    let is_list = block
        .get("__component")
        .and_then(Value::as_str)
        .is_some_and(|c| BlockKind::parse(c) == BlockKind::PropertiesList);
    if !is_list {
        return;
    }
    let Some(properties) = block.get_mut("properties").and_then(Value::as_array_mut) else {
        return;
    };

    for property in properties.iter_mut().filter_map(Value::as_object_mut) {
        if property.get("image").is_some_and(truthy) {
            continue;
        }
        let Some(first) = property
            .get("images")
            .and_then(Value::as_array)
            .and_then(|images| images.first())
        else {
            continue;
        };
        let image = match first {
            Value::Object(map) if map.contains_key("url") => Some(first.clone()),
            raw => normalize_media(raw, base).map(|m| m.to_value()),
        };
        if let Some(image) = image {
            property.insert("image".into(), image);
        }
    }
}
