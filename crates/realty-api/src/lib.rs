// realty-api: Async Rust client for the headless CMS REST API.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{CmsClient, Populate};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
