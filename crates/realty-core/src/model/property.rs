use serde::{Deserialize, Serialize};

use super::de;
use super::media::Media;

/// A property listing.
///
/// `price` is always a float; malformed or missing prices are `0.0`.
/// Room counts and area stay floats so fractional CMS values survive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub price: f64,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Media>>,
}

impl Property {
    /// First listed image, used as the card thumbnail.
    pub fn cover(&self) -> Option<&Media> {
        self.images.as_ref().and_then(|images| images.first())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
