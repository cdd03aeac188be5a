// Field-level normalization as an ordered rule table. The CMS emits the
// same conceptual field wrapped or flat depending on populate depth, so
// several rules can match one value; the first rule in `RULES` that
// yields a value decides. A rule returning `None` passes the field on.

use serde_json::{Map, Value};

use super::media::is_absolute;
use super::{
    BaseUrl, Shape, is_relation_shaped, normalize_media, normalize_relation, str_field,
};

type Rule = fn(&str, &Value, &BaseUrl) -> Option<Value>;

const RULES: &[(&str, Rule)] = &[
    ("null", null_passthrough),
    ("media-path", media_path_string),
    ("image-object", image_object),
    ("relation", relation),
    ("media", media_like),
    ("rich-text", rich_text),
    ("icon", icon_name),
    ("nested", nested_object),
    ("list", list),
];

/// Normalize every field of a plain object. Non-objects are returned as-is.
pub fn normalize_object(value: &Value, base: &BaseUrl) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map, base)),
        other => other.clone(),
    }
}

pub(crate) fn normalize_map(map: &Map<String, Value>, base: &BaseUrl) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), normalize_field(key, value, base)))
        .collect()
}

/// Apply the first matching rule; primitives fall through unchanged.
pub(crate) fn normalize_field(key: &str, value: &Value, base: &BaseUrl) -> Value {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(key, value, base))
        .unwrap_or_else(|| value.clone())
}

// ── Rules ────────────────────────────────────────────────────────────

fn null_passthrough(_key: &str, value: &Value, _base: &BaseUrl) -> Option<Value> {
    value.is_null().then_some(Value::Null)
}

fn media_path_string(key: &str, value: &Value, base: &BaseUrl) -> Option<Value> {
    let path = value.as_str().filter(|s| s.starts_with('/'))?;
    let media_key = matches!(key, "image" | "avatar" | "url")
        || key.to_ascii_lowercase().contains("image");
    if !media_key {
        return None;
    }
    let mut wrapped = Map::new();
    wrapped.insert("url".into(), Value::String(path.to_owned()));
    normalize_media(&Value::Object(wrapped), base).map(|m| m.to_value())
}

fn image_object(key: &str, value: &Value, base: &BaseUrl) -> Option<Value> {
    if !matches!(key, "image" | "avatar") || !(value.is_object() || value.is_array()) {
        return None;
    }
    if let Some(media) = normalize_media(value, base) {
        return Some(media.to_value());
    }

    // A flat `{url, alt}` the media resolver skipped because a `data` key
    // was present but empty-handed.
    let map = value.as_object()?;
    let url = str_field(map, "url").filter(|u| u.starts_with('/') && !is_absolute(u))?;
    let mut out = Map::new();
    out.insert("url".into(), Value::String(base.absolutize(url)));
    if let Some(alt) = str_field(map, "alt").or_else(|| str_field(map, "alternativeText")) {
        out.insert("alt".into(), Value::String(alt.to_owned()));
    }
    Some(Value::Object(out))
}

fn relation(_key: &str, value: &Value, base: &BaseUrl) -> Option<Value> {
    (Shape::of(value) == Shape::Relation).then(|| normalize_relation(value, base))
}

fn media_like(_key: &str, value: &Value, base: &BaseUrl) -> Option<Value> {
    if Shape::of(value) != Shape::Media {
        return None;
    }
    normalize_media(value, base).map(|m| m.to_value())
}

fn rich_text(key: &str, value: &Value, _base: &BaseUrl) -> Option<Value> {
    let map = value.as_object()?;
    (key == "content" && map.contains_key("data")).then(|| value.clone())
}

fn icon_name(key: &str, value: &Value, _base: &BaseUrl) -> Option<Value> {
    if key != "icon" {
        return None;
    }
    let map = value.as_object()?;
    let nested = |outer: Option<&Value>| -> Option<String> {
        let outer = outer?.as_object()?;
        str_field(outer, "name")
            .or_else(|| {
                outer
                    .get("attributes")
                    .and_then(Value::as_object)
                    .and_then(|attrs| str_field(attrs, "name"))
            })
            .map(str::to_owned)
    };
    str_field(map, "name")
        .map(str::to_owned)
        .or_else(|| nested(map.get("attributes")))
        .or_else(|| nested(map.get("data")))
        .map(Value::String)
}

fn nested_object(_key: &str, value: &Value, base: &BaseUrl) -> Option<Value> {
    value.as_object().map(|map| Value::Object(normalize_map(map, base)))
}

fn list(_key: &str, value: &Value, base: &BaseUrl) -> Option<Value> {
    let items = value.as_array()?;
    Some(Value::Array(items.iter().map(|item| list_item(item, base)).collect()))
}

fn list_item(item: &Value, base: &BaseUrl) -> Value {
    match item {
        Value::Object(map) if is_relation_shaped(map) => normalize_relation(item, base),
        Value::Object(map) => {
            if map.contains_key("data") || map.contains_key("url") {
                if let Some(media) = normalize_media(item, base) {
                    return media.to_value();
                }
            }
            Value::Object(normalize_map(map, base))
        }
        Value::Array(inner) => Value::Array(inner.iter().map(|i| list_item(i, base)).collect()),
        other => other.clone(),
    }
}
