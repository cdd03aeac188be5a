// ── Data source resolver ──
//
// Decides per call whether content comes from the CMS or the local
// fallback dataset, and owns the failure boundary around every CMS call.
//
// The remote half of each operation returns `Result<Remote<T>, CoreError>`:
// `Ok(Remote::Empty)` means the CMS answered and has nothing, `Err` means
// it could not answer. Only `Err` ever reaches the fallback dataset; which
// local value (if any) replaces it is decided per operation below.

use std::future::Future;

use realty_api::{CmsClient, Populate, TransportConfig};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::error::CoreError;
use crate::fallback::FallbackData;
use crate::model::{Block, GlobalOptions, Page, Property, TeamMember, Testimonial};
use crate::normalize::{
    BaseUrl, normalize_blocks, normalize_global_options, normalize_page, normalize_pages,
    normalize_property,
};

/// Outcome of a CMS query that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    /// The CMS returned matching content.
    Found(T),
    /// The CMS answered with no match (`data: null` or `data: []`).
    Empty,
}

impl<T> Remote<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Self::Found)
    }
}

/// Where pages come from, as seen by the route resolver.
pub trait PageSource {
    /// Page by slug; `None` when there is no such page.
    fn fetch_page(&self, slug: &str) -> impl Future<Output = Option<Page>> + Send;

    /// Every page.
    fn fetch_pages(&self) -> impl Future<Output = Vec<Page>> + Send;
}

/// CMS-or-fallback content access.
pub struct ContentSource {
    client: Option<CmsClient>,
    base: BaseUrl,
    fallback: FallbackData,
}

impl ContentSource {
    /// Build from runtime configuration.
    ///
    /// Fails only on configuration problems: an unreadable fallback file,
    /// an unparsable CMS URL, or a token that cannot be sent as a header.
    pub fn new(config: &SourceConfig) -> Result<Self, CoreError> {
        let fallback = FallbackData::load(config.fallback_path.as_deref())?;

        if !config.uses_cms() {
            debug!(mode = %config.mode, "serving content from the local dataset");
            return Ok(Self {
                client: None,
                base: BaseUrl::from_option(config.cms_url.as_deref()),
                fallback,
            });
        }

        let transport = TransportConfig {
            tls: (&config.tls).into(),
            timeout: config.timeout,
        };
        let client = CmsClient::from_token(
            config.cms_url.as_deref().unwrap_or_default(),
            config.api_token.as_ref(),
            &transport,
        )?;
        let base = BaseUrl::new(&client.origin());
        debug!(mode = %config.mode, cms = %base, "serving content from the CMS");

        Ok(Self::with_client(client, fallback))
    }

    /// Remote source around an existing client.
    pub fn with_client(client: CmsClient, fallback: FallbackData) -> Self {
        let base = BaseUrl::new(&client.origin());
        Self {
            client: Some(client),
            base,
            fallback,
        }
    }

    /// Local-only source.
    pub fn local(fallback: FallbackData) -> Self {
        Self {
            client: None,
            base: BaseUrl::default(),
            fallback,
        }
    }

    pub fn uses_cms(&self) -> bool {
        self.client.is_some()
    }

    /// Base URL relative media paths are joined against.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    pub fn fallback(&self) -> &FallbackData {
        &self.fallback
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Page by slug. An explicit no-match is `None`; a failed request
    /// falls back to the local page with the same slug.
    pub async fn fetch_page(&self, slug: &str) -> Option<Page> {
        let Some(client) = &self.client else {
            return self.fallback.page_by_slug(slug);
        };
        match self.remote_page(client, slug).await {
            Ok(outcome) => outcome.into_option(),
            Err(err) => {
                log_fallback("fetch_page", Some(slug), &err);
                self.fallback.page_by_slug(slug)
            }
        }
    }

    /// Every page. An explicit empty list is returned as-is; a failed
    /// request falls back to the full local list.
    pub async fn fetch_pages(&self) -> Vec<Page> {
        let Some(client) = &self.client else {
            return self.fallback.all_pages();
        };
        match self.remote_pages(client).await {
            Ok(outcome) => outcome.into_option().unwrap_or_default(),
            Err(err) => {
                log_fallback("fetch_pages", None, &err);
                self.fallback.all_pages()
            }
        }
    }

    /// Blocks of the page with CMS id `page_id`.
    ///
    /// Without a slug there is nothing to fall back to, so both an empty
    /// answer and a failure yield no blocks.
    pub async fn fetch_blocks(&self, page_id: &str, slug: Option<&str>) -> Vec<Block> {
        let local = || slug.map(|s| self.fallback.blocks_for_page(s)).unwrap_or_default();
        let Some(client) = &self.client else {
            return local();
        };
        match self.remote_blocks(client, page_id).await {
            Ok(outcome) => outcome.into_option().unwrap_or_default(),
            Err(err) => {
                log_fallback("fetch_blocks", slug, &err);
                local()
            }
        }
    }

    /// Site-wide options. Explicit `data: null` is `None`; a failed request
    /// falls back to the local options.
    pub async fn fetch_global_options(&self) -> Option<GlobalOptions> {
        let Some(client) = &self.client else {
            return self.fallback.global_options();
        };
        match self.remote_global_options(client).await {
            Ok(outcome) => outcome.into_option(),
            Err(err) => {
                log_fallback("fetch_global_options", None, &err);
                self.fallback.global_options()
            }
        }
    }

    /// Property by slug, with the same policy as [`Self::fetch_page`].
    pub async fn fetch_property(&self, slug: &str) -> Option<Property> {
        let Some(client) = &self.client else {
            return self.fallback.property_by_slug(slug);
        };
        match self.remote_property(client, slug).await {
            Ok(outcome) => outcome.into_option(),
            Err(err) => {
                log_fallback("fetch_property", Some(slug), &err);
                self.fallback.property_by_slug(slug)
            }
        }
    }

    /// Local-only collections with no CMS endpoint behind them.
    pub fn all_properties(&self) -> Vec<Property> {
        self.fallback.all_properties()
    }

    pub fn testimonials(&self) -> Vec<Testimonial> {
        self.fallback.testimonials()
    }

    pub fn team(&self) -> Vec<TeamMember> {
        self.fallback.team()
    }

    // ── Remote halves ────────────────────────────────────────────────

    async fn remote_page(&self, client: &CmsClient, slug: &str) -> Result<Remote<Page>, CoreError> {
        let response = client.find_pages_by_slug(slug).await?;
        if is_empty_response(&response) {
            return Ok(Remote::Empty);
        }
        Ok(Remote::from_option(normalize_page(&response, &self.base)))
    }

    async fn remote_pages(&self, client: &CmsClient) -> Result<Remote<Vec<Page>>, CoreError> {
        let response = client.list_pages().await?;
        let pages = normalize_pages(&response, &self.base);
        Ok(if pages.is_empty() {
            Remote::Empty
        } else {
            Remote::Found(pages)
        })
    }

    async fn remote_blocks(
        &self,
        client: &CmsClient,
        page_id: &str,
    ) -> Result<Remote<Vec<Block>>, CoreError> {
        let response = client
            .get_page(page_id, &Populate::Field("blocks".into()))
            .await?;
        let blocks = normalize_blocks(extract_blocks(&response), &self.base);
        Ok(if blocks.is_empty() {
            Remote::Empty
        } else {
            Remote::Found(blocks)
        })
    }

    async fn remote_global_options(
        &self,
        client: &CmsClient,
    ) -> Result<Remote<GlobalOptions>, CoreError> {
        let response = client.get_global_options().await?;
        if is_empty_response(&response) {
            return Ok(Remote::Empty);
        }
        Ok(Remote::from_option(normalize_global_options(&response, &self.base)))
    }

    async fn remote_property(
        &self,
        client: &CmsClient,
        slug: &str,
    ) -> Result<Remote<Property>, CoreError> {
        let response = client.find_properties_by_slug(slug).await?;
        if is_empty_response(&response) {
            return Ok(Remote::Empty);
        }
        Ok(Remote::from_option(normalize_property(&response, &self.base)))
    }
}

impl PageSource for ContentSource {
    fn fetch_page(&self, slug: &str) -> impl Future<Output = Option<Page>> + Send {
        ContentSource::fetch_page(self, slug)
    }

    fn fetch_pages(&self) -> impl Future<Output = Vec<Page>> + Send {
        ContentSource::fetch_pages(self)
    }
}

/// `data` missing, `null`, or an empty array.
fn is_empty_response(response: &Value) -> bool {
    match response.get("data") {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// `data.attributes.blocks`, `data.blocks`, or a bare `data` array.
fn extract_blocks(response: &Value) -> &Value {
    static NONE: Value = Value::Null;
    let Some(data) = response.get("data") else {
        return &NONE;
    };
    let nested = data.get("attributes").and_then(|a| a.get("blocks"));
    let flat = data.get("blocks");
    [nested, flat]
        .into_iter()
        .flatten()
        .find(|blocks| !blocks.is_null())
        .unwrap_or(if data.is_array() { data } else { &NONE })
}

fn log_fallback(operation: &'static str, slug: Option<&str>, err: &CoreError) {
    let slug = slug.unwrap_or_default();
    if err.is_connection() {
        debug!(operation, slug, error = %err, "CMS unreachable, using local data");
    } else {
        warn!(operation, slug, error = %err, "CMS request failed, using local data");
    }
}
