// ── CMS response normalization ──
//
// Turns the CMS's structurally ambiguous JSON (nested `attributes` vs flat
// entities, `{data: ...}` wrappers vs bare objects, arrays vs singletons,
// relative vs absolute media URLs) into the stable shapes of
// `crate::model`. Every function here is pure and total: malformed input
// yields `None`, an empty collection, or the input unchanged.

mod block;
mod global;
mod media;
mod object;
mod page;
mod property;
mod relation;

pub use block::{normalize_block, normalize_blocks};
pub use global::{build_menu_hierarchy, normalize_global_options};
pub use media::{BaseUrl, DEFAULT_BASE_URL, normalize_media};
pub use object::normalize_object;
pub use page::{fix_image_urls, normalize_collection, normalize_entity, normalize_page, normalize_pages};
pub use property::normalize_property;
pub use relation::normalize_relation;

use serde_json::{Map, Value};

// ── Shape detection ──────────────────────────────────────────────────

/// Structural classification of a field value.
///
/// Detectors run in a fixed order, so a value that is both
/// relation-shaped and media-shaped (both carry `data`) is always a
/// relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{data: null}`, `{data: {id, ...}}` or `{data: [...]}`.
    Relation,
    /// `{data: <truthy>}`, `{url}`, or `{attributes: {url}}`.
    Media,
    /// Any other object.
    Plain,
    /// An array.
    List,
    /// Null, string, number or bool.
    Scalar,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(map) if is_relation_shaped(map) => Self::Relation,
            Value::Object(map) if is_media_shaped(map) => Self::Media,
            Value::Object(_) => Self::Plain,
            Value::Array(_) => Self::List,
            _ => Self::Scalar,
        }
    }
}

pub(crate) fn is_relation_shaped(map: &Map<String, Value>) -> bool {
    match map.get("data") {
        Some(Value::Null | Value::Array(_)) => true,
        Some(Value::Object(inner)) => inner.contains_key("id"),
        _ => false,
    }
}

pub(crate) fn is_media_shaped(map: &Map<String, Value>) -> bool {
    let has_data = map.get("data").is_some_and(truthy);
    let has_url = map.contains_key("url");
    let has_attributes_url = map
        .get("attributes")
        .and_then(Value::as_object)
        .is_some_and(|attrs| attrs.contains_key("url"));
    has_data || has_url || has_attributes_url
}

// ── Value helpers ────────────────────────────────────────────────────

/// Loose truthiness as the CMS client ecosystem treats JSON values:
/// `null`, `false`, `0`, `""` are false; every object and array is true.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A non-empty string field.
pub(crate) fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Identifier as a string: strings pass through, numbers are formatted,
/// anything else becomes `""`.
pub fn stringify_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Coerce a price-like value to `f64`: numbers as-is, strings by their
/// leading decimal prefix, everything else (and NaN) as `0.0`.
pub fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// Longest leading `[+-]digits[.digits][e[+-]digits]` of `raw`.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = leading_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = leading_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    // The exponent only counts when a digit follows the marker.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = leading_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// The field map of an entity: its `attributes` object when nested,
/// otherwise the entity itself.
pub(crate) fn entity_fields(entity: &Map<String, Value>) -> &Map<String, Value> {
    match entity.get("attributes") {
        Some(Value::Object(attrs)) => attrs,
        _ => entity,
    }
}

/// The first entity of a single or collection response.
pub(crate) fn first_entity(response: &Value) -> Option<&Map<String, Value>> {
    match response.get("data")? {
        Value::Array(items) => items.first()?.as_object(),
        Value::Object(entity) => Some(entity),
        _ => None,
    }
}

/// Normalize an entity's fields and prepend its stringified `id`.
pub(crate) fn normalize_entity_map(entity: &Map<String, Value>, base: &BaseUrl) -> Value {
    let fields = entity_fields(entity);
    let mut out = Map::with_capacity(fields.len() + 1);
    out.insert("id".into(), Value::String(stringify_id(entity.get("id"))));

    for (key, value) in object::normalize_map(fields, base) {
        if key != "id" {
            out.insert(key, value);
        }
    }

    Value::Object(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn shape_prefers_relation_over_media() {
        assert_eq!(Shape::of(&json!({ "data": { "id": 1, "url": "/a.png" } })), Shape::Relation);
        assert_eq!(Shape::of(&json!({ "data": null })), Shape::Relation);
        assert_eq!(Shape::of(&json!({ "data": [] })), Shape::Relation);
        assert_eq!(Shape::of(&json!({ "data": { "url": "/a.png" } })), Shape::Media);
        assert_eq!(Shape::of(&json!({ "attributes": { "url": "/a.png" } })), Shape::Media);
        assert_eq!(Shape::of(&json!({ "title": "x" })), Shape::Plain);
        assert_eq!(Shape::of(&json!([1, 2])), Shape::List);
        assert_eq!(Shape::of(&json!("x")), Shape::Scalar);
    }

    #[test]
    fn coerce_f64_handles_strings_and_garbage() {
        assert!((coerce_f64(&json!("450000.50")) - 450_000.5).abs() < f64::EPSILON);
        assert!((coerce_f64(&json!("1200 per month")) - 1200.0).abs() < f64::EPSILON);
        assert!((coerce_f64(&json!(99)) - 99.0).abs() < f64::EPSILON);
        assert!(coerce_f64(&json!("call us")).abs() < f64::EPSILON);
        assert!(coerce_f64(&json!(null)).abs() < f64::EPSILON);
        assert!(coerce_f64(&json!({ "amount": 5 })).abs() < f64::EPSILON);
    }

    #[test]
    fn coerce_f64_accepts_exponents() {
        assert!((coerce_f64(&json!("1.5e6")) - 1_500_000.0).abs() < f64::EPSILON);
        assert!((coerce_f64(&json!("2E+3 EUR")) - 2_000.0).abs() < f64::EPSILON);
        assert!((coerce_f64(&json!("25e-1")) - 2.5).abs() < f64::EPSILON);
        assert!((coerce_f64(&json!(".5")) - 0.5).abs() < f64::EPSILON);
        // A bare marker is not an exponent.
        assert!((coerce_f64(&json!("7e")) - 7.0).abs() < f64::EPSILON);
        assert!((coerce_f64(&json!("7e+x")) - 7.0).abs() < f64::EPSILON);
        assert!((coerce_f64(&json!("-3.")) + 3.0).abs() < f64::EPSILON);
        assert!(coerce_f64(&json!("-.e5")).abs() < f64::EPSILON);
        assert!(coerce_f64(&json!("1e999")).abs() < f64::EPSILON);
    }

    #[test]
    fn stringify_id_variants() {
        assert_eq!(stringify_id(Some(&json!(7))), "7");
        assert_eq!(stringify_id(Some(&json!("abc"))), "abc");
        assert_eq!(stringify_id(Some(&json!(null))), "");
        assert_eq!(stringify_id(None), "");
    }

    #[test]
    fn first_entity_from_collection_and_single() {
        let collection = json!({ "data": [{ "id": 1 }, { "id": 2 }] });
        assert_eq!(first_entity(&collection).unwrap()["id"], 1);

        let single = json!({ "data": { "id": 3 } });
        assert_eq!(first_entity(&single).unwrap()["id"], 3);

        assert!(first_entity(&json!({ "data": [] })).is_none());
        assert!(first_entity(&json!({ "data": null })).is_none());
        assert!(first_entity(&json!([])).is_none());
    }
}
