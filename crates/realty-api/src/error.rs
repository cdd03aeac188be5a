use thiserror::Error;

/// Top-level error type for the `realty-api` crate.
///
/// Covers every failure mode of a single CMS round trip: building the
/// client, reaching the server, a non-2xx answer, and an unreadable body.
/// `realty-core` maps these into its own `CoreError`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The bearer token cannot be encoded as a header value.
    #[error("Invalid API token: {message}")]
    InvalidToken { message: String },

    // ── CMS API ─────────────────────────────────────────────────────
    /// The token was rejected (HTTP 401 / 403).
    #[error("CMS rejected the API token (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Structured error from the CMS (`{ data: null, error: { status, name, message } }`).
    #[error("CMS API error (HTTP {status}): {message}")]
    Api {
        message: String,
        name: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
