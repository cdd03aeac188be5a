//! Site-wide options and navigation menus.

use realty_core::{ContentSource, GlobalOptions, Link, MenuItem};

use crate::cli::{GlobalOpts, MenuLocation};
use crate::error::CliError;
use crate::output;

fn links_line(links: &[Link]) -> String {
    if links.is_empty() {
        return "-".into();
    }
    links
        .iter()
        .map(|l| format!("{} <{}>", l.text, l.url))
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail(g: &GlobalOptions, color: bool) -> String {
    let mut lines = Vec::new();

    if let Some(ref site) = g.site {
        lines.push(output::heading("Site", color));
        lines.push(format!("  Name:        {}", site.site_name));
        lines.push(format!("  URL:         {}", site.site_url));
        if let Some(ref desc) = site.site_description {
            lines.push(format!("  Description: {desc}"));
        }
        if let Some(ref favicon) = site.favicon {
            lines.push(format!("  Favicon:     {}", favicon.url));
        }
    }

    if let Some(ref header) = g.header {
        lines.push(output::heading("Header", color));
        if let Some(ref logo) = header.logo {
            lines.push(format!("  Logo:        {}", logo.url));
        }
        if let Some(ref text) = header.logo_text {
            lines.push(format!("  Logo text:   {text}"));
        }
        let items = header.menu.as_deref().unwrap_or_default();
        lines.push(format!("  Menu:        {} top-level items", items.len()));
        lines.push(format!("  Links:       {}", links_line(&header.links)));
    }

    if let Some(ref footer) = g.footer {
        lines.push(output::heading("Footer", color));
        if let Some(ref copyright) = footer.copyright {
            lines.push(format!("  Copyright:   {copyright}"));
        }
        lines.push(format!("  Links:       {}", links_line(&footer.links)));
        for social in footer.social_media.iter().flatten() {
            lines.push(format!("  Social:      {} <{}>", social.name, social.url));
        }
    }

    lines.join("\n")
}

/// Indented navigation tree, two spaces per level.
fn menu_tree(items: &[MenuItem], color: bool) -> String {
    items
        .iter()
        .flat_map(MenuItem::walk)
        .map(|(depth, item)| {
            format!(
                "{}{}  {}",
                "  ".repeat(depth),
                item.title,
                output::muted(&item.url, color)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn load(source: &ContentSource) -> Result<GlobalOptions, CliError> {
    source
        .fetch_global_options()
        .await
        .ok_or_else(|| CliError::not_found("global options", "site", "pages"))
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn show(source: &ContentSource, global: &GlobalOpts) -> Result<(), CliError> {
    let options = load(source).await?;
    let color = output::should_color(&global.color_mode());
    let out = output::render_single(
        &global.output_format(),
        &options,
        |g| detail(g, color),
        |g| g.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn menu(
    source: &ContentSource,
    location: MenuLocation,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let options = load(source).await?;
    let items = match location {
        MenuLocation::Header => options.header.and_then(|h| h.menu),
        MenuLocation::Footer => options.footer.and_then(|f| f.menu),
    }
    .unwrap_or_default();

    let color = output::should_color(&global.color_mode());
    let out = output::render_single(
        &global.output_format(),
        items.as_slice(),
        |items| menu_tree(items, color),
        |items| {
            items
                .iter()
                .flat_map(MenuItem::walk)
                .map(|(_, item)| item.url.clone())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, url: &str, children: Vec<MenuItem>) -> MenuItem {
        MenuItem {
            id: title.to_lowercase(),
            title: title.into(),
            url: url.into(),
            order: 0,
            children,
        }
    }

    #[test]
    fn tree_indents_children() {
        let menu = vec![
            item("Home", "/", vec![]),
            item("Properties", "/properties", vec![item("Cottage", "/properties/cottage", vec![])]),
        ];
        assert_eq!(
            menu_tree(&menu, false),
            "Home  /\nProperties  /properties\n  Cottage  /properties/cottage"
        );
    }

    #[test]
    fn empty_links_render_dash() {
        assert_eq!(links_line(&[]), "-");
        let links = [Link {
            text: "Privacy".into(),
            url: "/privacy".into(),
        }];
        assert_eq!(links_line(&links), "Privacy </privacy>");
    }
}
