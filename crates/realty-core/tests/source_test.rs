#![allow(clippy::unwrap_used)]
// Data source resolver against a mock CMS: the empty-versus-failed
// contract, per-operation fallback, and mode selection.

use std::io::Write;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use realty_core::{ContentSource, CoreError, DataSourceMode, FallbackData, SourceConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn token() -> Option<SecretString> {
    Some(SecretString::from("test-token".to_string()))
}

async fn setup() -> (MockServer, ContentSource) {
    let server = MockServer::start().await;
    let source = ContentSource::new(&SourceConfig::cms(server.uri(), token())).unwrap();
    assert!(source.uses_cms());
    (server, source)
}

/// A CMS URL nothing listens on.
fn unreachable() -> ContentSource {
    let config = SourceConfig::cms("http://127.0.0.1:9", token());
    ContentSource::new(&config).unwrap()
}

fn local() -> FallbackData {
    FallbackData::embedded().unwrap()
}

// ── fetch_pages ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_pages_explicit_empty_is_not_a_fallback() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .and(query_param("populate", "deep"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(source.fetch_pages().await, Vec::new());
}

#[tokio::test]
async fn test_fetch_pages_network_error_falls_back_to_local_list() {
    let pages = unreachable().fetch_pages().await;
    assert_eq!(pages, local().all_pages());
}

#[tokio::test]
async fn test_fetch_pages_server_error_falls_back() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert_eq!(source.fetch_pages().await, local().all_pages());
}

#[tokio::test]
async fn test_fetch_pages_normalizes_each_entity() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [
            { "id": 1, "attributes": { "slug": "home", "title": "Home", "blocks": [] } },
            { "id": 2, "slug": "about", "title": "About", "blocks": [] },
        ] })))
        .mount(&server)
        .await;

    let pages = source.fetch_pages().await;
    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
}

// ── fetch_page ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_page_normalizes_against_cms_origin() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .and(query_param("filters[slug][$eq]", "home"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": 1, "attributes": {
            "slug": "home",
            "title": "Home",
            "blocks": [{
                "__component": "blocks.hero",
                "id": 5,
                "title": "Welcome",
                "image": { "data": { "attributes": { "url": "/hero.png" } } },
            }],
        } }] })))
        .expect(1)
        .mount(&server)
        .await;

    let page = source.fetch_page("home").await.unwrap();
    assert_eq!(page.id, "1");
    assert_eq!(
        page.blocks[0].field("image").unwrap(),
        &json!({ "url": format!("{}/hero.png", server.uri()) })
    );
}

#[tokio::test]
async fn test_fetch_page_explicit_empty_is_none() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .and(query_param("filters[slug][$eq]", "about"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    // The local dataset has an `about` page; it must not be used.
    assert!(local().page_by_slug("about").is_some());
    assert_eq!(source.fetch_page("about").await, None);
}

#[tokio::test]
async fn test_fetch_page_failure_falls_back_to_local_page() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    assert_eq!(source.fetch_page("about").await, local().page_by_slug("about"));
    assert_eq!(source.fetch_page("nowhere").await, None);
}

// ── fetch_blocks ────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_blocks_extracts_nested_blocks() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages/7"))
        .and(query_param("populate", "blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 7, "attributes": {
            "blocks": [
                { "__component": "blocks.cta", "id": 1, "heading": "Call", "button": { "text": "Go", "url": "https://x.example" } },
                { "__component": "blocks.carousel", "id": 2 },
            ],
        } } })))
        .mount(&server)
        .await;

    let blocks = source.fetch_blocks("7", None).await;
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].id, "1");
    assert!(!blocks[1].kind().is_known());
}

#[tokio::test]
async fn test_fetch_blocks_failure_depends_on_slug() {
    let source = unreachable();
    assert!(source.fetch_blocks("1", None).await.is_empty());
    assert_eq!(source.fetch_blocks("1", Some("home")).await, local().blocks_for_page("home"));
}

#[tokio::test]
async fn test_fetch_blocks_explicit_empty_ignores_slug() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pages/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1, "blocks": [] } })))
        .mount(&server)
        .await;

    assert!(source.fetch_blocks("1", Some("home")).await.is_empty());
}

// ── fetch_global_options ────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_global_options_uses_nested_populate() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/global-option"))
        .and(query_param("populate[header][populate][logo]", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1, "attributes": {
            "header": {
                "logo": { "data": { "id": 3, "attributes": { "url": "/logo.svg" } } },
                "menu": { "items": [
                    { "id": 1, "order": 0, "page": { "data": { "id": 1, "attributes": { "slug": "home", "title": "Home" } } } },
                    { "id": 2, "order": 1, "parentOrder": 0, "customUrl": "listings" },
                ] },
            },
            "footer": null,
        } } })))
        .mount(&server)
        .await;

    let options = source.fetch_global_options().await.unwrap();
    assert!(options.footer.is_none());
    let header = options.header.unwrap();
    assert_eq!(header.logo.unwrap().url, format!("{}/logo.svg", server.uri()));
    let menu = header.menu.unwrap();
    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0].url, "/");
    assert_eq!(menu[0].children[0].url, "/listings");
}

#[tokio::test]
async fn test_fetch_global_options_null_is_none() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/global-option"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    assert_eq!(source.fetch_global_options().await, None);
}

#[tokio::test]
async fn test_fetch_global_options_failure_falls_back() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/global-option"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert_eq!(source.fetch_global_options().await, local().global_options());
}

// ── fetch_property ──────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_property_found_empty_and_failed() {
    let (server, source) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/properties"))
        .and(query_param("filters[slug][$eq]", "loft"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": 4, "attributes": {
            "slug": "loft", "title": "Loft", "price": "199000",
            "images": { "data": [{ "id": 1, "attributes": { "url": "/loft.jpg" } }] },
        } }] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/properties"))
        .and(query_param("filters[slug][$eq]", "gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/properties"))
        .and(query_param("filters[slug][$eq]", "modern-family-home"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let loft = source.fetch_property("loft").await.unwrap();
    assert!((loft.price - 199_000.0).abs() < f64::EPSILON);
    assert_eq!(loft.images.unwrap()[0].alt.as_deref(), Some("Loft"));

    assert_eq!(source.fetch_property("gone").await, None);
    assert_eq!(
        source.fetch_property("modern-family-home").await,
        local().property_by_slug("modern-family-home")
    );
}

// ── Mode selection ──────────────────────────────────────────────────

#[tokio::test]
async fn test_mock_mode_never_calls_the_cms() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let config = SourceConfig::cms(server.uri(), token()).with_mode(DataSourceMode::Mock);
    let source = ContentSource::new(&config).unwrap();
    assert!(!source.uses_cms());
    assert_eq!(source.fetch_pages().await, local().all_pages());
    assert_eq!(source.fetch_blocks("1", None).await, Vec::new());
}

#[tokio::test]
async fn test_auto_mode_without_token_is_local() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let source = ContentSource::new(&SourceConfig::cms(server.uri(), None)).unwrap();
    assert!(!source.uses_cms());
    assert!(source.fetch_page("home").await.is_some());
}

#[tokio::test]
async fn test_cms_mode_without_token_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SourceConfig::cms(server.uri(), None).with_mode(DataSourceMode::Cms);
    let source = ContentSource::new(&config).unwrap();
    assert!(source.fetch_pages().await.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[test]
fn test_bad_fallback_file_fails_construction() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ broken").unwrap();

    let config = SourceConfig {
        fallback_path: Some(file.path().to_path_buf()),
        ..SourceConfig::mock()
    };
    assert!(matches!(
        ContentSource::new(&config),
        Err(CoreError::Config { .. })
    ));
}
