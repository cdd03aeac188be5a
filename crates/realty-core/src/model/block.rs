// ── Blocks ──
//
// A block keeps its full normalized field map so fields the typed views do
// not know about still reach the renderer. `Block::typed` is the checked
// view; a discriminator outside the known set, or fields that do not fit
// the variant, yield `BlockVariant::Unknown` rather than an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;
use super::media::Media;
use super::property::{TeamMember, Testimonial};

// ── BlockKind ────────────────────────────────────────────────────────

/// Block discriminator (`__component`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Hero,
    Features,
    Cta,
    Content,
    PropertiesList,
    ContactForm,
    GoogleMap,
    Testimonials,
    Team,
    Other(String),
}

impl BlockKind {
    pub fn parse(component: &str) -> Self {
        match component {
            "blocks.hero" => Self::Hero,
            "blocks.features" => Self::Features,
            "blocks.cta" => Self::Cta,
            "blocks.content" => Self::Content,
            "blocks.properties-list" => Self::PropertiesList,
            "blocks.contact-form" => Self::ContactForm,
            "blocks.google-map" => Self::GoogleMap,
            "blocks.testimonials" => Self::Testimonials,
            "blocks.team" => Self::Team,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Hero => "blocks.hero",
            Self::Features => "blocks.features",
            Self::Cta => "blocks.cta",
            Self::Content => "blocks.content",
            Self::PropertiesList => "blocks.properties-list",
            Self::ContactForm => "blocks.contact-form",
            Self::GoogleMap => "blocks.google-map",
            Self::Testimonials => "blocks.testimonials",
            Self::Team => "blocks.team",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Block ────────────────────────────────────────────────────────────

/// One unit of a page's dynamic zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, deserialize_with = "de::id_string")]
    pub id: String,
    #[serde(rename = "__component", default)]
    pub component: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Block {
    /// Split a normalized block object into id, discriminator and fields.
    ///
    /// Non-object input yields an empty block with an empty discriminator,
    /// which renders as nothing.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self {
                id: String::new(),
                component: String::new(),
                fields: Map::new(),
            };
        };

        let id = crate::normalize::stringify_id(map.get("id"));
        let component = match map.remove("__component") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        map.remove("id");

        Self {
            id,
            component,
            fields: map,
        }
    }

    /// Internal JSON shape: `{id, __component, ...fields}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len() + 2);
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert("__component".into(), Value::String(self.component.clone()));
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    pub fn kind(&self) -> BlockKind {
        BlockKind::parse(&self.component)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Typed view of this block.
    pub fn typed(&self) -> BlockVariant {
        let fields = Value::Object(self.fields.clone());
        let parsed = match self.kind() {
            BlockKind::Hero => serde_json::from_value(fields).map(BlockVariant::Hero),
            BlockKind::Features => serde_json::from_value(fields).map(BlockVariant::Features),
            BlockKind::Cta => serde_json::from_value(fields).map(BlockVariant::Cta),
            BlockKind::Content => serde_json::from_value(fields).map(BlockVariant::Content),
            BlockKind::PropertiesList => {
                serde_json::from_value(fields).map(BlockVariant::PropertiesList)
            }
            BlockKind::ContactForm => serde_json::from_value(fields).map(BlockVariant::ContactForm),
            BlockKind::GoogleMap => serde_json::from_value(fields).map(BlockVariant::GoogleMap),
            BlockKind::Testimonials => {
                serde_json::from_value(fields).map(BlockVariant::Testimonials)
            }
            BlockKind::Team => serde_json::from_value(fields).map(BlockVariant::Team),
            BlockKind::Other(_) => return BlockVariant::Unknown,
        };

        parsed.unwrap_or_else(|e| {
            tracing::debug!(component = %self.component, id = %self.id, error = %e, "block fields do not fit typed view");
            BlockVariant::Unknown
        })
    }
}

// ── Typed variants ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BlockVariant {
    Hero(HeroBlock),
    Features(FeaturesBlock),
    Cta(CtaBlock),
    Content(ContentBlock),
    PropertiesList(PropertiesListBlock),
    ContactForm(ContactFormBlock),
    GoogleMap(GoogleMapBlock),
    Testimonials(TestimonialsBlock),
    Team(TeamBlock),
    /// Unrecognized discriminator or mismatched fields. Renders as nothing.
    Unknown,
}

/// `shared.button` / `shared.link`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "de::url_string")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroBlock {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<Media>,
    pub cta: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "de::icon_name")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesBlock {
    pub title: Option<String>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaBlock {
    pub heading: String,
    pub text: Option<String>,
    pub button: Option<Link>,
    #[serde(deserialize_with = "de::icon_name")]
    pub icon: Option<String>,
}

/// Rich text is passed through untouched: either a markdown string or the
/// editor's structured payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyCard {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub price: f64,
    pub location: String,
    pub image: Option<Media>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesListBlock {
    pub title: Option<String>,
    pub properties: Vec<PropertyCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactFormBlock {
    pub title: Option<String>,
    pub submit_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PinInfo {
    pub title: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoogleMapBlock {
    pub title: Option<String>,
    pub address: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub longitude: f64,
    pub zoom: u8,
    pub pin_info: Option<PinInfo>,
}

impl Default for GoogleMapBlock {
    fn default() -> Self {
        Self {
            title: None,
            address: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            zoom: 15,
            pin_info: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialsBlock {
    pub title: Option<String>,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamBlock {
    pub title: Option<String>,
    pub team: Vec<TeamMember>,
}
