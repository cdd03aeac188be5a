//! Property listing handlers.

use tabled::Tabled;

use realty_core::{ContentSource, Property};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Beds")]
    bedrooms: String,
}

impl From<&Property> for PropertyRow {
    fn from(p: &Property) -> Self {
        Self {
            slug: p.slug.clone(),
            title: p.title.clone(),
            price: format_price(p.price),
            location: p.location.clone(),
            bedrooms: p.bedrooms.map(|b| b.to_string()).unwrap_or_default(),
        }
    }
}

/// Whole-unit price with thousands separators.
fn format_price(price: f64) -> String {
    let whole = format!("{:.0}", price.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if price < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn detail(p: &Property) -> String {
    let mut lines = vec![
        format!("ID:        {}", p.id),
        format!("Slug:      {}", p.slug),
        format!("Title:     {}", p.title),
        format!("Price:     {}", format_price(p.price)),
        format!("Location:  {}", p.location),
    ];
    if let Some(beds) = p.bedrooms {
        lines.push(format!("Bedrooms:  {beds}"));
    }
    if let Some(baths) = p.bathrooms {
        lines.push(format!("Bathrooms: {baths}"));
    }
    if let Some(sqft) = p.sqft {
        lines.push(format!("Area:      {sqft} sqft"));
    }
    for image in p.images.iter().flatten() {
        lines.push(format!("Image:     {}", image.url));
    }
    if !p.description.is_empty() {
        lines.push(String::new());
        lines.push(p.description.clone());
    }
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn show(source: &ContentSource, slug: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let property = source
        .fetch_property(slug)
        .await
        .ok_or_else(|| CliError::not_found("property", slug, "properties"))?;
    let out = output::render_single(&global.output_format(), &property, detail, |p| p.slug.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn list(source: &ContentSource, global: &GlobalOpts) -> Result<(), CliError> {
    let properties = source.all_properties();
    let out = output::render_list(
        &global.output_format(),
        &properties,
        |p| PropertyRow::from(p),
        |p| p.slug.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
