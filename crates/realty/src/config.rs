//! CLI flag overrides on top of `realty-config`.
//!
//! Core never sees these types; it receives a pre-built `SourceConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use realty_config::Config;
use realty_core::{DataSourceMode, SourceConfig, TlsVerification};

use crate::cli::{ColorMode, DataSource, GlobalOpts, OutputFormat};
use crate::error::CliError;

impl From<DataSource> for DataSourceMode {
    fn from(source: DataSource) -> Self {
        match source {
            DataSource::Mock => Self::Mock,
            DataSource::Cms => Self::Cms,
            DataSource::Auto => Self::Auto,
        }
    }
}

impl GlobalOpts {
    /// Output format in effect; `table` until defaults are applied.
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    /// Color mode in effect; `auto` until defaults are applied.
    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

/// Config file in effect: `--config` or the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(realty_config::config_path)
}

/// Load the config file plus `REALTY_*` environment. A missing file is fine.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(realty_config::load_config_from(&config_path(global))?)
}

/// Translate file config + global flags into a `SourceConfig`.
///
/// Flags win over the file; `--token` wins over the whole credential chain.
pub fn resolve_source(global: &GlobalOpts, cfg: &Config) -> Result<SourceConfig, CliError> {
    let mut source = realty_config::to_source_config(cfg)?;

    if let Some(mode) = global.data_source {
        source.mode = mode.into();
    }
    if let Some(ref url) = global.cms_url {
        let url = url.trim();
        source.cms_url = if url.is_empty() {
            None
        } else {
            Some(realty_config::validate_cms_url(url)?)
        };
    }
    if let Some(ref token) = global.token {
        source.api_token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        source.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        source.timeout = Some(Duration::from_secs(secs));
    }

    Ok(source)
}

/// Fill `--output` and `--color` from the file's `[defaults]` when the
/// flags were not given.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_default("defaults.output", &cfg.defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default("defaults.color", &cfg.defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw.trim(), true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}
