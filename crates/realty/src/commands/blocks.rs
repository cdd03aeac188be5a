//! Block listing and one-line block summaries.

use tabled::Tabled;

use realty_core::{Block, BlockVariant, ContentSource};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BlockRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

impl From<&Block> for BlockRow {
    fn from(b: &Block) -> Self {
        Self {
            id: b.id.clone(),
            component: b.component.clone(),
            summary: summary(b),
        }
    }
}

/// Short human description of a block, from its typed view.
pub fn summary(block: &Block) -> String {
    match block.typed() {
        BlockVariant::Hero(hero) => hero.title,
        BlockVariant::Features(f) => count_label(f.title, f.features.len(), "feature"),
        BlockVariant::Cta(cta) => cta.heading,
        BlockVariant::Content(_) => "rich text".into(),
        BlockVariant::PropertiesList(p) => count_label(p.title, p.properties.len(), "property"),
        BlockVariant::ContactForm(form) => form.title.unwrap_or_else(|| "contact form".into()),
        BlockVariant::GoogleMap(map) => map.address,
        BlockVariant::Testimonials(t) => count_label(t.title, t.testimonials.len(), "testimonial"),
        BlockVariant::Team(t) => count_label(t.title, t.team.len(), "member"),
        BlockVariant::Unknown => "-".into(),
    }
}

fn count_label(title: Option<String>, n: usize, noun: &str) -> String {
    let noun = match (n, noun) {
        (1, _) => noun.to_owned(),
        (_, "property") => "properties".to_owned(),
        _ => format!("{noun}s"),
    };
    match title {
        Some(title) => format!("{title} ({n} {noun})"),
        None => format!("{n} {noun}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    source: &ContentSource,
    page_id: &str,
    slug: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let blocks = source.fetch_blocks(page_id, slug).await;
    let out = output::render_list(&global.output_format(), &blocks, |b| BlockRow::from(b), |b| {
        format!("{}\t{}", b.id, b.component)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
