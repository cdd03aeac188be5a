// ── Route-to-page resolution ──
//
// Maps a site path to a page. The root path has no slug of its own, so a
// short list of conventional home slugs is tried before searching the full
// page list by title.

use tracing::debug;

use crate::model::Page;
use crate::source::PageSource;

/// Slugs a home page is conventionally published under, in lookup order.
pub const HOME_SLUGS: &[&str] = &["home", "home-2", "landing", "index", "homepage"];

const HOME_TITLE: &str = "Home";

/// What a route asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageIdentifier {
    /// The root route; matched by the title `Home`.
    Home,
    /// Any other route; its path is the slug.
    Slug(String),
}

impl PageIdentifier {
    /// Identify the page for a request path. Query and fragment are
    /// ignored, as are leading and trailing slashes.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let slug = path.trim().trim_matches('/');
        if slug.is_empty() {
            Self::Home
        } else {
            Self::Slug(slug.to_owned())
        }
    }
}

/// Resolve the page for `path`, or `None` when nothing matches.
pub async fn resolve_page_for_route<S: PageSource + ?Sized>(source: &S, path: &str) -> Option<Page> {
    match PageIdentifier::from_path(path) {
        PageIdentifier::Home => resolve_home(source).await,
        PageIdentifier::Slug(slug) => resolve_slug(source, &slug).await,
    }
}

async fn resolve_home<S: PageSource + ?Sized>(source: &S) -> Option<Page> {
    for slug in HOME_SLUGS {
        if let Some(page) = source.fetch_page(slug).await {
            debug!(slug, "home page found by slug");
            return Some(page);
        }
    }

    let pages = source.fetch_pages().await;
    if let Some(page) = find_by(&pages, |p| p.title.as_str(), HOME_TITLE) {
        return Some(page);
    }
    pages.into_iter().find(|p| {
        let slug = p.slug.to_lowercase();
        !slug.is_empty() && (slug.starts_with("home") || slug == "landing")
    })
}

async fn resolve_slug<S: PageSource + ?Sized>(source: &S, slug: &str) -> Option<Page> {
    if let Some(page) = source.fetch_page(slug).await {
        return Some(page);
    }
    let pages = source.fetch_pages().await;
    find_by(&pages, |p| p.slug.as_str(), slug)
}

/// Exact match on the normalized field, then the first page whose field
/// starts with (but is not equal to) the normalized value.
fn find_by(pages: &[Page], field: impl Fn(&Page) -> &str, value: &str) -> Option<Page> {
    let wanted = normalize(value);
    pages
        .iter()
        .find(|p| normalize(field(p)) == wanted)
        .or_else(|| {
            pages.iter().find(|p| {
                let candidate = normalize(field(p));
                candidate.starts_with(&wanted) && candidate != wanted
            })
        })
        .cloned()
}

fn normalize(value: &str) -> String {
    value.to_lowercase().trim().to_owned()
}
