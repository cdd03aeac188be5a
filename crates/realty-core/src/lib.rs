// realty-core: CMS response normalization, fallback data and page resolution.

pub mod config;
pub mod error;
pub mod fallback;
pub mod model;
pub mod normalize;
pub mod route;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DataSourceMode, SourceConfig, TlsVerification};
pub use error::CoreError;
pub use fallback::FallbackData;
pub use normalize::BaseUrl;
pub use route::{HOME_SLUGS, PageIdentifier, resolve_page_for_route};
pub use source::{ContentSource, PageSource, Remote};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Pages and blocks
    Block, BlockKind, BlockVariant, Page,
    // Site chrome
    Footer, GlobalOptions, Header, Link, MenuItem, Site, SocialLink,
    // Listings and people
    Media, Property, TeamMember, Testimonial,
};
