// Async HTTP client for the headless CMS REST API.
//
// Base path: {cms}/api/
// Auth: Authorization: Bearer <token>
//
// Every method returns the raw JSON body. Shape reconciliation (nested vs
// flat entities, wrapped vs bare media) belongs to `realty-core`.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Base URL used when none is configured.
pub const DEFAULT_CMS_URL: &str = "http://localhost:1337";

/// Nested populate path for the global-option single type. Menu items are
/// components that reference pages and properties, so each relation has to
/// be requested explicitly.
const GLOBAL_OPTION_POPULATE: &[(&str, &str)] = &[
    ("populate[site][populate][favicon]", "*"),
    ("populate[header][populate][logo]", "*"),
    ("populate[header][populate][menu][populate][items][populate][page]", "*"),
    ("populate[header][populate][menu][populate][items][populate][property]", "*"),
    ("populate[header][populate][links]", "*"),
    ("populate[footer][populate][links]", "*"),
    ("populate[footer][populate][socialMedia]", "*"),
    ("populate[footer][populate][menu][populate][items][populate][page]", "*"),
    ("populate[footer][populate][menu][populate][items][populate][property]", "*"),
];

// ── Error response shape from the CMS ────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Populate ─────────────────────────────────────────────────────────

/// How much related data the CMS should inline.
///
/// The chosen depth is what makes responses come back nested or flat, so
/// callers pick it per endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Populate {
    /// `populate=deep` (deep-populate plugin: every relation, media and component).
    Deep,
    /// `populate=<field>` for a single top-level field.
    Field(String),
}

impl Populate {
    fn as_param(&self) -> (&'static str, String) {
        match self {
            Self::Deep => ("populate", "deep".into()),
            Self::Field(field) => ("populate", field.clone()),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the CMS content API.
pub struct CmsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CmsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, an optional bearer token and a transport config.
    ///
    /// The token is injected as a sensitive default header on every request.
    pub fn from_token(
        base_url: &str,
        token: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::InvalidToken {
                    message: format!("invalid header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the API root: `{scheme}://{host}[:port][/prefix]/api/`.
    ///
    /// A missing scheme defaults to `http://`; an empty value falls back to
    /// [`DEFAULT_CMS_URL`].
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let raw = raw.trim();
        let with_scheme = if raw.is_empty() {
            DEFAULT_CMS_URL.to_owned()
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_owned()
        } else {
            format!("http://{raw}")
        };

        let mut url = Url::parse(&with_scheme)?;
        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    /// The API root every request path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The CMS origin without the `/api/` suffix, as used for media URLs.
    pub fn origin(&self) -> String {
        let root = self.base_url.as_str().trim_end_matches('/');
        root.strip_suffix("/api").unwrap_or(root).to_owned()
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get_with_params(&self, path: &str, params: &[(&str, String)]) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::Unauthorized {
                status: status.as_u16(),
            };
        }

        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorEnvelope>(&raw) {
            Ok(ErrorEnvelope { error: Some(err) }) => Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                name: err.name,
            },
            _ => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                name: None,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Pages ────────────────────────────────────────────────────────

    /// `GET /api/pages?populate=deep`
    pub async fn list_pages(&self) -> Result<Value, Error> {
        self.get_with_params("pages", &[Populate::Deep.as_param()])
            .await
    }

    /// `GET /api/pages?filters[slug][$eq]={slug}&populate=deep`
    pub async fn find_pages_by_slug(&self, slug: &str) -> Result<Value, Error> {
        self.get_with_params(
            "pages",
            &[
                ("filters[slug][$eq]", slug.to_owned()),
                Populate::Deep.as_param(),
            ],
        )
        .await
    }

    /// `GET /api/pages/{id}?populate=...`
    pub async fn get_page(&self, id: &str, populate: &Populate) -> Result<Value, Error> {
        self.get_with_params(&format!("pages/{id}"), &[populate.as_param()])
            .await
    }

    // ── Properties ───────────────────────────────────────────────────

    /// `GET /api/properties?populate=deep`
    pub async fn list_properties(&self) -> Result<Value, Error> {
        self.get_with_params("properties", &[Populate::Deep.as_param()])
            .await
    }

    /// `GET /api/properties?filters[slug][$eq]={slug}&populate=deep`
    pub async fn find_properties_by_slug(&self, slug: &str) -> Result<Value, Error> {
        self.get_with_params(
            "properties",
            &[
                ("filters[slug][$eq]", slug.to_owned()),
                Populate::Deep.as_param(),
            ],
        )
        .await
    }

    // ── Global options ───────────────────────────────────────────────

    /// `GET /api/global-option` with the nested header/footer/menu populate path.
    pub async fn get_global_options(&self) -> Result<Value, Error> {
        let params: Vec<(&str, String)> = GLOBAL_OPTION_POPULATE
            .iter()
            .map(|(key, value)| (*key, (*value).to_owned()))
            .collect();
        self.get_with_params("global-option", &params).await
    }
}
