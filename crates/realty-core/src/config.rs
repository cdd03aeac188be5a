// ── Runtime data-source configuration ──
//
// Describes *where* content comes from: the CMS, the local fallback
// dataset, or a per-call choice between them. Built by the CLI (via
// `realty-config`) and handed in; core never reads config files itself.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Which backend serves content.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DataSourceMode {
    /// Always serve the local fallback dataset.
    Mock,
    /// Always query the CMS (falling back only on failure).
    Cms,
    /// Query the CMS when both a URL and a token are configured.
    #[default]
    Auto,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging CMS).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for realty_api::TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Everything the data source resolver reads per call.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    pub mode: DataSourceMode,
    /// CMS origin, with or without scheme (`cms.example:1337` is fine).
    pub cms_url: Option<String>,
    pub api_token: Option<SecretString>,
    /// Overall request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
    pub tls: TlsVerification,
    /// Replacement for the embedded fallback dataset.
    pub fallback_path: Option<PathBuf>,
}

impl SourceConfig {
    /// Local data only.
    pub fn mock() -> Self {
        Self {
            mode: DataSourceMode::Mock,
            ..Self::default()
        }
    }

    /// Remote CMS at `url` with an optional token, in `auto` mode.
    pub fn cms(url: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            cms_url: Some(url.into()),
            api_token: token,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: DataSourceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether calls go to the CMS.
    ///
    /// `auto` requires both a non-empty URL and a token.
    pub fn uses_cms(&self) -> bool {
        match self.mode {
            DataSourceMode::Mock => false,
            DataSourceMode::Cms => true,
            DataSourceMode::Auto => {
                self.cms_url.as_deref().is_some_and(|u| !u.trim().is_empty())
                    && self.api_token.is_some()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("mock".parse::<DataSourceMode>().unwrap(), DataSourceMode::Mock);
        assert_eq!("CMS".parse::<DataSourceMode>().unwrap(), DataSourceMode::Cms);
        assert_eq!(DataSourceMode::default().to_string(), "auto");
        assert!("remote".parse::<DataSourceMode>().is_err());
    }

    #[test]
    fn auto_needs_url_and_token() {
        let token = Some(SecretString::from("t0k3n".to_owned()));
        assert!(SourceConfig::cms("http://cms.local", token.clone()).uses_cms());
        assert!(!SourceConfig::cms("http://cms.local", None).uses_cms());
        assert!(!SourceConfig::cms("  ", token.clone()).uses_cms());
        assert!(!SourceConfig::default().uses_cms());
    }

    #[test]
    fn explicit_modes_override() {
        assert!(SourceConfig::default().with_mode(DataSourceMode::Cms).uses_cms());
        let full = SourceConfig::cms("http://cms.local", Some(SecretString::from("t".to_owned())));
        assert!(!full.with_mode(DataSourceMode::Mock).uses_cms());
        assert!(!SourceConfig::mock().uses_cms());
    }
}
