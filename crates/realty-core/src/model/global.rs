use serde::{Deserialize, Serialize};

use super::block::Link;
use super::de;
use super::media::Media;

/// Site-wide options: identity, header and footer.
///
/// Never constructed with both `header` and `footer` absent; the normalizer
/// yields `None` for the whole value instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOptions {
    #[serde(default, deserialize_with = "de::id_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<Site>,
    #[serde(default)]
    pub header: Option<Header>,
    #[serde(default)]
    pub footer: Option<Footer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Site {
    pub site_name: String,
    pub site_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<Media>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<MenuItem>>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Footer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media: Option<Vec<SocialLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<MenuItem>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A navigation entry. `children` is empty for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub order: i64,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    /// Depth-first walk over this item and its descendants.
    pub fn walk(&self) -> Vec<(usize, &MenuItem)> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, self)];
        while let Some((depth, item)) = stack.pop() {
            out.push((depth, item));
            for child in item.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}
