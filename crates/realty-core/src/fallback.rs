// ── Local fallback dataset ──
//
// Already-normalized content served when the CMS is not configured or
// cannot be reached. The default dataset is compiled into the binary; a
// replacement file can be pointed to through `SourceConfig::fallback_path`.

use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;
use crate::model::{Block, GlobalOptions, Page, Property, TeamMember, Testimonial};

const EMBEDDED: &str = include_str!("../data/fallback.json");

/// The fallback document: `pages`, `properties`, `globalOptions`,
/// `testimonials`, `team`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallbackData {
    pages: Vec<Page>,
    properties: Vec<Property>,
    global_options: Option<GlobalOptions>,
    testimonials: Vec<Testimonial>,
    team: Vec<TeamMember>,
}

impl FallbackData {
    /// The dataset shipped with the crate.
    pub fn embedded() -> Result<Self, CoreError> {
        Self::from_json(EMBEDDED)
            .map_err(|e| CoreError::Internal(format!("embedded fallback dataset is invalid: {e}")))
    }

    /// Load a replacement dataset from disk.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("cannot read fallback dataset {}: {e}", path.display()))
        })?;
        Self::from_json(&raw).map_err(|e| {
            CoreError::config(format!("invalid fallback dataset {}: {e}", path.display()))
        })
    }

    /// `from_path` when a path is given, else the embedded dataset.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<Page> {
        self.pages.iter().find(|p| p.slug == slug).cloned()
    }

    pub fn all_pages(&self) -> Vec<Page> {
        self.pages.clone()
    }

    pub fn property_by_slug(&self, slug: &str) -> Option<Property> {
        self.properties.iter().find(|p| p.slug == slug).cloned()
    }

    pub fn all_properties(&self) -> Vec<Property> {
        self.properties.clone()
    }

    /// Blocks of the page with `slug`; empty when there is no such page.
    pub fn blocks_for_page(&self, slug: &str) -> Vec<Block> {
        self.pages
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| p.blocks.clone())
            .unwrap_or_default()
    }

    pub fn global_options(&self) -> Option<GlobalOptions> {
        self.global_options.clone()
    }

    pub fn testimonials(&self) -> Vec<Testimonial> {
        self.testimonials.clone()
    }

    pub fn team(&self) -> Vec<TeamMember> {
        self.team.clone()
    }
}
