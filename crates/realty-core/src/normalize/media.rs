use std::fmt;

use serde_json::{Map, Value};

use super::{str_field, truthy};
use crate::model::Media;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

/// CMS origin that relative media paths are joined against.
///
/// Always carries a scheme and never ends in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Normalize a configured base: empty → [`DEFAULT_BASE_URL`], bare
    /// host → `http://` prefixed, trailing slash stripped.
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let with_scheme = if raw.is_empty() {
            DEFAULT_BASE_URL.to_owned()
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_owned()
        } else {
            format!("http://{raw}")
        };
        let trimmed = with_scheme.strip_suffix('/').unwrap_or(&with_scheme);
        Self(trimmed.to_owned())
    }

    pub fn from_option(raw: Option<&str>) -> Self {
        Self::new(raw.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a relative path against this base. URLs that already start
    /// with `http` or `//` are returned unchanged.
    pub fn absolutize(&self, url: &str) -> String {
        if is_absolute(url) {
            url.to_owned()
        } else if url.starts_with('/') {
            format!("{}{url}", self.0)
        } else {
            format!("{}/{url}", self.0)
        }
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(DEFAULT_BASE_URL.to_owned())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn is_absolute(url: &str) -> bool {
    url.starts_with("http") || url.starts_with("//")
}

/// Resolve any of the CMS media representations to `{url, alt?}`.
///
/// Tried in order: `{data: ...}` wrapper, flat `url`, `attributes.url`,
/// a bare rooted path string, then the first element of an array. The
/// first representation present decides; if it carries no URL the result
/// is `None`.
pub fn normalize_media(value: &Value, base: &BaseUrl) -> Option<Media> {
    if !truthy(value) {
        return None;
    }

    let (url, alt) = match value {
        Value::Object(map) => resolve_object(map)?,
        Value::String(path) if path.starts_with('/') => (path.as_str(), None),
        Value::Array(items) => return normalize_media(items.first()?, base),
        _ => return None,
    };

    Some(Media::new(base.absolutize(url), alt.map(str::to_owned)))
}

fn resolve_object(map: &Map<String, Value>) -> Option<(&str, Option<&str>)> {
    if let Some(data) = map.get("data").filter(|d| truthy(d)) {
        let data = data.as_object()?;
        if let Some(attrs) = data.get("attributes").filter(|a| truthy(a)) {
            let attrs = attrs.as_object()?;
            return Some((str_field(attrs, "url")?, str_field(attrs, "alternativeText")));
        }
        return Some((str_field(data, "url")?, str_field(data, "alternativeText")));
    }

    if map.get("url").is_some_and(truthy) {
        return Some((str_field(map, "url")?, str_field(map, "alternativeText")));
    }

    let attrs = map.get("attributes").and_then(Value::as_object)?;
    Some((str_field(attrs, "url")?, str_field(attrs, "alternativeText")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn base() -> BaseUrl {
        BaseUrl::new("https://cms.example")
    }

    #[test]
    fn base_url_normalization() {
        assert_eq!(BaseUrl::new("").as_str(), "http://localhost:1337");
        assert_eq!(BaseUrl::new("cms.local:1337").as_str(), "http://cms.local:1337");
        assert_eq!(BaseUrl::new("https://cms.example/").as_str(), "https://cms.example");
        assert_eq!(BaseUrl::from_option(None), BaseUrl::default());
    }

    #[test]
    fn relative_paths_are_joined_to_base() {
        for path in ["/uploads/a.png", "/b.jpg", "/deep/nested/c.webp"] {
            let media = normalize_media(&json!({ "url": path }), &base()).unwrap();
            assert_eq!(media.url, format!("https://cms.example{path}"));
        }
    }

    #[test]
    fn absolute_urls_are_unchanged() {
        for url in [
            "https://img.example/a.png",
            "http://other.host/b.png",
            "//cdn.example/c.png",
        ] {
            let media = normalize_media(&json!({ "url": url }), &base()).unwrap();
            assert_eq!(media.url, url);
        }
    }

    #[test]
    fn wrapped_forms() {
        let nested = json!({ "data": { "id": 3, "attributes": { "url": "/a.png", "alternativeText": "A" } } });
        assert_eq!(
            normalize_media(&nested, &base()),
            Some(Media::new("https://cms.example/a.png", Some("A".into())))
        );

        let flat_data = json!({ "data": { "url": "/b.png" } });
        assert_eq!(
            normalize_media(&flat_data, &base()),
            Some(Media::new("https://cms.example/b.png", None))
        );

        let attributes = json!({ "attributes": { "url": "/c.png", "caption": "ignored" } });
        assert_eq!(
            normalize_media(&attributes, &base()),
            Some(Media::new("https://cms.example/c.png", None))
        );
    }

    #[test]
    fn bare_string_and_array() {
        assert_eq!(
            normalize_media(&json!("/x.png"), &base()).unwrap().url,
            "https://cms.example/x.png"
        );
        assert_eq!(
            normalize_media(&json!([{ "url": "/first.png" }, { "url": "/second.png" }]), &base())
                .unwrap()
                .url,
            "https://cms.example/first.png"
        );
    }

    #[test]
    fn unresolvable_input_is_none() {
        for value in [
            json!(null),
            json!(""),
            json!("relative.png"),
            json!([]),
            json!({ "data": null }),
            json!({ "data": { "id": 1 } }),
            json!({ "title": "no url" }),
            json!(42),
        ] {
            assert_eq!(normalize_media(&value, &base()), None, "{value}");
        }
    }

    #[test]
    fn empty_alt_is_dropped() {
        let media = normalize_media(&json!({ "url": "/a.png", "alternativeText": "" }), &base());
        assert_eq!(media.unwrap().alt, None);
    }
}
