// ── Domain model ──
//
// The stable shapes handed to page rendering, regardless of which CMS
// response shape was ingested. Everything here is a read-only output of
// `crate::normalize` or of the local fallback dataset.

pub mod block;
pub mod global;
pub mod media;
pub mod page;
pub mod property;

pub use block::{
    Block, BlockKind, BlockVariant, ContactFormBlock, ContentBlock, CtaBlock, Feature,
    FeaturesBlock, GoogleMapBlock, HeroBlock, Link, PinInfo, PropertiesListBlock, PropertyCard,
    TeamBlock, TestimonialsBlock,
};
pub use global::{Footer, GlobalOptions, Header, MenuItem, Site, SocialLink};
pub use media::Media;
pub use page::Page;
pub use property::{Property, TeamMember, Testimonial};

/// Lenient serde helpers for fields the CMS types inconsistently.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept `"12"`, `12` or `null` for identifier fields.
    pub fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(crate::normalize::stringify_id(Some(&value)))
    }

    /// Accept a number or a numeric string; anything else becomes `0.0`.
    pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(crate::normalize::coerce_f64(&value))
    }

    /// Accept a plain string or a normalized media object (`{url, alt?}`).
    ///
    /// Link `url` fields holding a rooted path are promoted to media objects
    /// by the generic normalizer; rendering only wants the string back.
    pub fn url_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => s,
            Value::Object(map) => map
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            _ => String::new(),
        })
    }

    /// Accept a string, or an icon object that still carries a `name`.
    pub fn icon_name<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Object(map)) => map.get("name").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
    }
}
