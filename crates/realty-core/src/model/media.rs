use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized media reference.
///
/// `url` is always absolute (scheme + host, or protocol-relative `//`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Media {
    pub fn new(url: impl Into<String>, alt: Option<String>) -> Self {
        Self {
            url: url.into(),
            alt,
        }
    }

    /// JSON form used inside normalized field maps (`alt` omitted when absent).
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("url".into(), Value::String(self.url.clone()));
        if let Some(alt) = &self.alt {
            map.insert("alt".into(), Value::String(alt.clone()));
        }
        Value::Object(map)
    }
}
