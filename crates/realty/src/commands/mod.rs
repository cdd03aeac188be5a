//! Command dispatch: bridges CLI args -> content source -> output formatting.

pub mod blocks;
pub mod config_cmd;
pub mod globals;
pub mod pages;
pub mod people;
pub mod properties;

use realty_core::ContentSource;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a content command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    source: &ContentSource,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Page { slug } => pages::show(source, &slug, global).await,
        Command::Pages => pages::list(source, global).await,
        Command::Resolve { path } => pages::resolve(source, &path, global).await,
        Command::Blocks { page_id, slug } => {
            blocks::handle(source, &page_id, slug.as_deref(), global).await
        }
        Command::Globals => globals::show(source, global).await,
        Command::Menu { location } => globals::menu(source, location, global).await,
        Command::Property { slug } => properties::show(source, &slug, global).await,
        Command::Properties => properties::list(source, global),
        Command::Testimonials => people::testimonials(source, global),
        Command::Team => people::team(source, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
