//! Config subcommand handlers.

use realty_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the token.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let _ = writeln!(out, "data_source = \"{}\"", cfg.data_source);
    if let Some(ref url) = cfg.cms_url {
        let _ = writeln!(out, "cms_url = \"{url}\"");
    }
    if cfg.api_token.is_some() {
        let _ = writeln!(out, "api_token = \"****\"");
    }
    if let Some(ref env) = cfg.api_token_env {
        let _ = writeln!(out, "api_token_env = \"{env}\"");
    }
    if let Some(timeout) = cfg.timeout {
        let _ = writeln!(out, "timeout = {timeout}");
    }
    let _ = writeln!(out, "insecure = {}", cfg.insecure);
    if let Some(ref ca) = cfg.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }
    if let Some(ref path) = cfg.fallback_path {
        let _ = writeln!(out, "fallback_path = \"{}\"", path.display());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = write!(out, "color = \"{}\"", cfg.defaults.color);

    out
}

fn redacted(mut cfg: Config) -> Config {
    if cfg.api_token.is_some() {
        cfg.api_token = Some("****".into());
    }
    cfg
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &mut GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let loaded = config::load(global)?;
            config::apply_defaults(global, &loaded)?;
            let cfg = redacted(loaded);
            let out = match global.output_format() {
                OutputFormat::Table | OutputFormat::Plain => format_config_redacted(&cfg),
                ref format => output::render_single(format, &cfg, format_config_redacted, |_| String::new())?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { token_env, force } => {
            let path = config::config_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cms_url = global
                .cms_url
                .as_deref()
                .map(realty_config::validate_cms_url)
                .transpose()?;

            let cfg = Config {
                data_source: global.data_source.map(Into::into).unwrap_or_default(),
                cms_url,
                api_token: global.token.clone(),
                api_token_env: token_env,
                timeout: global.timeout,
                insecure: global.insecure,
                ..Config::default()
            };
            realty_config::save_config_to(&cfg, &path)?;

            if !global.quiet {
                eprintln!("Config written to {}", path.display());
            }
            Ok(())
        }
    }
}
