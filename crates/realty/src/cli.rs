//! Clap derive structures for the `realty` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// realty -- inspect the site's CMS content from the command line
#[derive(Debug, Parser)]
#[command(
    name = "realty",
    version,
    about = "Inspect realty site content from the CMS or the local dataset",
    long_about = "Fetches pages, blocks, menus and property listings the way the site \
        renders them.\n\n\
        Content comes from the CMS when a URL and token are configured, and from \
        the bundled local dataset otherwise or whenever the CMS is unreachable.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "REALTY_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where content comes from
    #[arg(long, short = 'd', env = "REALTY_DATA_SOURCE", global = true)]
    pub data_source: Option<DataSource>,

    /// CMS URL (overrides config)
    #[arg(long, short = 'u', env = "REALTY_CMS_URL", global = true)]
    pub cms_url: Option<String>,

    /// CMS API token
    #[arg(long, env = "REALTY_API_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: table, or `[defaults] output` from config]
    #[arg(long, short = 'o', env = "REALTY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto, or `[defaults] color` from config]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataSource {
    /// Local dataset only
    Mock,
    /// Always query the CMS
    Cms,
    /// CMS when both URL and token are set
    Auto,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MenuLocation {
    Header,
    Footer,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page by slug
    Page {
        /// Page slug (e.g. "about")
        slug: String,
    },

    /// List all pages
    #[command(alias = "ls")]
    Pages,

    /// List the blocks of a page
    Blocks {
        /// Page ID in the CMS
        page_id: String,

        /// Slug used to find local blocks when the CMS is unavailable
        #[arg(long, short = 's')]
        slug: Option<String>,
    },

    /// Show site-wide options (site, header, footer)
    #[command(alias = "global")]
    Globals,

    /// Print the header or footer navigation tree
    Menu {
        #[arg(value_enum, default_value = "header")]
        location: MenuLocation,
    },

    /// Show one property listing by slug
    Property {
        /// Property slug
        slug: String,
    },

    /// List the local property listings
    Properties,

    /// List the local testimonials
    Testimonials,

    /// List the local team members
    Team,

    /// Resolve a site path to the page it renders
    Resolve {
        /// Path such as "/", "/about" or "contact"
        path: String,
    },

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Write a config file from the current flags
    Init {
        /// Environment variable to read the API token from
        #[arg(long)]
        token_env: Option<String>,

        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
