//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use realty_config::ConfigError;
use realty_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the CMS at {url}")]
    #[diagnostic(
        code(realty::connection_failed),
        help(
            "Check that the CMS is running and reachable.\n\
             Reason: {reason}\n\
             Try: realty --data-source mock pages"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("CMS request timed out")]
    #[diagnostic(
        code(realty::timeout),
        help("Increase the timeout with --timeout or check CMS responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(realty::auth_failed),
        help(
            "Verify the API token (Settings > API Tokens in the CMS admin).\n\
             Pass it with --token or set REALTY_API_TOKEN."
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(realty::not_found),
        help("Run: realty {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("CMS API error ({code}): {message}")]
    #[diagnostic(code(realty::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(realty::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(realty::config_exists),
        help("Use --force to overwrite it, or edit it directly.")
    )]
    ConfigExists { path: String },

    #[error("{message}")]
    #[diagnostic(
        code(realty::config),
        help("Check the config file (realty config path) and REALTY_* environment variables.")
    )]
    Config { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(realty::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(realty::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(realty::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: format!("{entity_type}s"),
                resource_type: entity_type,
                identifier,
            },
            CoreError::Api {
                message,
                name,
                status,
            } => Self::ApiError {
                code: name
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },
            CoreError::Config { message } => Self::Config { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
