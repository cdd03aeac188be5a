//! Page command handlers: show, list, resolve.

use tabled::Tabled;

use realty_core::{ContentSource, Page, PageIdentifier, resolve_page_for_route};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::blocks;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Blocks")]
    blocks: usize,
}

impl From<&Page> for PageRow {
    fn from(p: &Page) -> Self {
        Self {
            id: p.id.clone(),
            slug: p.slug.clone(),
            title: p.title.clone(),
            blocks: p.blocks.len(),
        }
    }
}

fn detail(p: &Page) -> String {
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Slug:        {}", p.slug),
        format!("Title:       {}", p.title),
        format!("Meta title:  {}", p.meta_title.as_deref().unwrap_or("-")),
        format!("Description: {}", p.meta_description.as_deref().unwrap_or("-")),
        format!("Blocks:      {}", p.blocks.len()),
    ];
    for (i, block) in p.blocks.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {:<24} {}",
            i + 1,
            block.component,
            blocks::summary(block)
        ));
    }
    lines.join("\n")
}

fn render_page(page: &Page, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output_format(), page, detail, |p| p.slug.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn show(source: &ContentSource, slug: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let page = source
        .fetch_page(slug)
        .await
        .ok_or_else(|| CliError::not_found("page", slug, "pages"))?;
    render_page(&page, global)
}

pub async fn list(source: &ContentSource, global: &GlobalOpts) -> Result<(), CliError> {
    let pages = source.fetch_pages().await;
    let out = output::render_list(&global.output_format(), &pages, |p| PageRow::from(p), |p| p.slug.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn resolve(source: &ContentSource, path: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let page = resolve_page_for_route(source, path).await.ok_or_else(|| {
        let identifier = match PageIdentifier::from_path(path) {
            PageIdentifier::Home => "/".to_owned(),
            PageIdentifier::Slug(slug) => slug,
        };
        CliError::not_found("page", &identifier, "pages")
    })?;
    tracing::info!(path, slug = %page.slug, "route resolved");
    render_page(&page, global)
}
