// ── Core error types ──
//
// Errors that reach the content layer's callers. Transport details stay in
// `realty_api::Error`; the `From` impl below folds them into the handful of
// cases the data source resolver distinguishes when it decides how loudly
// to log a fallback.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to CMS at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("CMS request timed out")]
    Timeout,

    #[error("CMS rejected the API token: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("CMS API error: {message}")]
    Api {
        message: String,
        /// Error name from the CMS envelope (e.g. `ValidationError`).
        name: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The CMS could not be reached at all (refused, DNS, timeout).
    ///
    /// These are routine when developing offline against the fallback
    /// dataset, so the resolver logs them at `debug` instead of `warn`.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout)
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<realty_api::Error> for CoreError {
    fn from(err: realty_api::Error) -> Self {
        match err {
            realty_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_owned()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        name: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            realty_api::Error::Unauthorized { status } => CoreError::AuthenticationFailed {
                message: format!("HTTP {status}"),
            },
            realty_api::Error::InvalidToken { message } => {
                CoreError::AuthenticationFailed { message }
            }
            realty_api::Error::Api {
                message,
                name,
                status: 404,
            } => CoreError::NotFound {
                entity_type: name.unwrap_or_else(|| "resource".into()),
                identifier: message,
            },
            realty_api::Error::Api {
                message,
                name,
                status,
            } => CoreError::Api {
                message,
                name,
                status: Some(status),
            },
            realty_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid CMS URL: {e}"),
            },
            realty_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS setup failed: {message}"),
            },
            realty_api::Error::Deserialization { message, body } => CoreError::Api {
                message: format!("unreadable CMS response: {message} (body: {} bytes)", body.len()),
                name: None,
                status: None,
            },
        }
    }
}
