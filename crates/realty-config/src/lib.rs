//! Shared configuration for the realty CLI.
//!
//! A flat TOML file, `REALTY_`-prefixed environment overrides, API-token
//! resolution (env var → keyring → plaintext), and translation to
//! `realty_core::SourceConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use realty_core::{DataSourceMode, SourceConfig, TlsVerification};

/// Keyring service name; the entry's user is the CMS host.
pub const KEYRING_SERVICE: &str = "realty";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// `mock`, `cms` or `auto`.
    #[serde(default)]
    pub data_source: DataSourceMode,

    /// CMS origin (e.g. "https://cms.example.com").
    pub cms_url: Option<String>,

    /// API token (plaintext, prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Request timeout in seconds. Unset keeps the HTTP client default.
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Replacement for the embedded fallback dataset.
    pub fallback_path: Option<PathBuf>,

    #[serde(default)]
    pub defaults: Defaults,
}

/// CLI presentation defaults.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("site", "realty", "realty").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("realty");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from an explicit file + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("REALTY_").only(&ENV_KEYS));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Environment keys honoured under the `REALTY_` prefix.
const ENV_KEYS: [&str; 8] = [
    "data_source",
    "cms_url",
    "api_token",
    "api_token_env",
    "timeout",
    "insecure",
    "ca_cert",
    "fallback_path",
];

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring user for a CMS URL: its host (and port), or the raw value.
pub fn keyring_user(cms_url: &str) -> String {
    let raw = cms_url.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };
    url::Url::parse(&with_scheme)
        .ok()
        .and_then(|u| {
            u.host_str().map(|host| match u.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_owned(),
            })
        })
        .unwrap_or_else(|| raw.to_owned())
}

/// Resolve the API token from the credential chain (no CLI flag step).
///
/// A missing token is not an error: `auto` mode then serves local data.
pub fn resolve_api_token(cfg: &Config) -> Option<SecretString> {
    // 1. api_token_env → env var lookup
    if let Some(ref env_name) = cfg.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring, keyed by CMS host
    if let Some(ref cms_url) = cfg.cms_url {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(cms_url)) {
            if let Ok(secret) = entry.get_password() {
                return Some(SecretString::from(secret));
            }
        }
    }

    // 3. Plaintext in config
    cfg.api_token.clone().map(SecretString::from)
}

/// Build a `SourceConfig` from the file config, without CLI flag overrides.
pub fn to_source_config(cfg: &Config) -> Result<SourceConfig, ConfigError> {
    let cms_url = cfg
        .cms_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(validate_cms_url)
        .transpose()?;

    let tls = if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(SourceConfig {
        mode: cfg.data_source,
        cms_url,
        api_token: resolve_api_token(cfg),
        timeout: cfg.timeout.map(Duration::from_secs),
        tls,
        fallback_path: cfg.fallback_path.clone(),
    })
}

/// Accept `host[:port]` or a full http(s) URL.
pub fn validate_cms_url(raw: &str) -> Result<String, ConfigError> {
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_owned()
    } else if raw.contains("://") {
        return Err(ConfigError::Validation {
            field: "cms_url".into(),
            reason: format!("unsupported scheme in '{raw}'"),
        });
    } else {
        format!("http://{raw}")
    };

    url::Url::parse(&with_scheme).map_err(|e| ConfigError::Validation {
        field: "cms_url".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    Ok(raw.to_owned())
}
