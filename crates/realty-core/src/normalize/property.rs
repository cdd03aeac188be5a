use serde_json::{Map, Value};

use super::{BaseUrl, coerce_f64, entity_fields, first_entity, str_field, stringify_id, truthy};
use crate::model::{Media, Property};

/// Normalize a property from a single-entity or collection response.
///
/// Images arrive either as a bare array or as `{data: [...]}`; entries
/// without any resolvable URL are dropped. When no size is present the
/// best of `formats.large`, `formats.medium`, `formats.small` is used.
pub fn normalize_property(response: &Value, base: &BaseUrl) -> Option<Property> {
    let entity = first_entity(response)?;
    let fields = entity_fields(entity);
    let text = |key: &str| str_field(fields, key).map(str::to_owned).unwrap_or_default();
    let title = text("title");

    let raw_images: &[Value] = match fields.get("images") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Object(wrapper)) => wrapper
            .get("data")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    };
    let images: Vec<Media> = raw_images
        .iter()
        .filter_map(|img| property_image(img, &title, base))
        .collect();

    Some(Property {
        id: stringify_id(entity.get("id")),
        slug: text("slug"),
        title,
        price: fields.get("price").map_or(0.0, coerce_f64),
        location: text("location"),
        description: text("description"),
        bedrooms: nonzero(fields.get("bedrooms")),
        bathrooms: nonzero(fields.get("bathrooms")),
        sqft: nonzero(fields.get("sqft")),
        images: (!images.is_empty()).then_some(images),
    })
}

fn property_image(img: &Value, title: &str, base: &BaseUrl) -> Option<Media> {
    let map = img.as_object()?;
    let data = unwrap_image(map);

    let url = str_field(data, "url").or_else(|| {
        ["large", "medium", "small"].into_iter().find_map(|size| {
            data.get("formats")?
                .get(size)?
                .get("url")?
                .as_str()
                .filter(|s| !s.is_empty())
        })
    })?;

    let alt = str_field(data, "alternativeText")
        .or_else(|| str_field(data, "caption"))
        .or_else(|| Some(title).filter(|t| !t.is_empty()))
        .map(str::to_owned);

    Some(Media::new(base.absolutize(url), alt))
}

/// `attributes`, `data.attributes`, `data`, or the entry itself.
fn unwrap_image(map: &Map<String, Value>) -> &Map<String, Value> {
    truthy_object(map.get("attributes"))
        .or_else(|| truthy_object(map.get("data").and_then(|d| d.get("attributes"))))
        .or_else(|| truthy_object(map.get("data")))
        .unwrap_or(map)
}

fn truthy_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.filter(|v| truthy(v)).and_then(Value::as_object)
}

/// Numeric or numeric-string field, kept only when non-zero.
fn nonzero(value: Option<&Value>) -> Option<f64> {
    value.map(coerce_f64).filter(|n| *n != 0.0)
}
