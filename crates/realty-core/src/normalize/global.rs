// ── Global options ──
//
// Site identity, header and footer, plus the navigation menus. Menus
// arrive as a flat list of components that encode their hierarchy through
// `order` / `parentOrder`; `build_menu_hierarchy` turns that into a tree
// using an index arena so duplicate ids and cycles cannot lose items.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::{BaseUrl, entity_fields, normalize_media, str_field, stringify_id, truthy};
use crate::model::{Footer, GlobalOptions, Header, Link, MenuItem, Site, SocialLink};

/// Normalize the global-options single type.
///
/// `None` when the response carries no entity, or when both header and
/// footer are absent.
pub fn normalize_global_options(response: &Value, base: &BaseUrl) -> Option<GlobalOptions> {
    let data = response.get("data").filter(|d| truthy(d))?;
    let entity = data.as_object()?;
    let fields = entity_fields(entity);

    let header = truthy_object(fields.get("header")).map(|h| header(h, base));
    let footer = truthy_object(fields.get("footer")).map(footer);
    if header.is_none() && footer.is_none() {
        return None;
    }

    Some(GlobalOptions {
        id: stringify_id(entity.get("id")),
        site: truthy_object(fields.get("site")).map(|s| site(s, base)),
        header,
        footer,
    })
}

fn truthy_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.filter(|v| truthy(v)).and_then(Value::as_object)
}

fn owned(map: &Map<String, Value>, key: &str) -> Option<String> {
    str_field(map, key).map(str::to_owned)
}

fn site(map: &Map<String, Value>, base: &BaseUrl) -> Site {
    Site {
        site_name: owned(map, "siteName").unwrap_or_default(),
        site_url: owned(map, "siteUrl").unwrap_or_default(),
        site_description: owned(map, "siteDescription"),
        favicon: map.get("favicon").and_then(|f| normalize_media(f, base)),
    }
}

fn header(map: &Map<String, Value>, base: &BaseUrl) -> Header {
    Header {
        logo: map.get("logo").and_then(|l| normalize_media(l, base)),
        logo_text: owned(map, "logoText"),
        menu: menu(map),
        links: links(map.get("links")),
    }
}

fn footer(map: &Map<String, Value>) -> Footer {
    let social_media = map
        .get("socialMedia")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .map(|items| items.iter().map(social_link).collect());

    Footer {
        copyright: owned(map, "copyright"),
        links: links(map.get("links")),
        social_media,
        menu: menu(map),
    }
}

/// Link components come flat (`{text, url}`) or wrapped (`{data: {...}}`),
/// with `label`/`href` as alternate names.
fn links(value: Option<&Value>) -> Vec<Link> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|link| {
            let data = component_data(link, "text");
            Link {
                text: first_str(data, &["text", "label"]),
                url: first_str(data, &["url", "href"]),
            }
        })
        .collect()
}

fn social_link(value: &Value) -> SocialLink {
    let data = component_data(value, "name");
    let icon = data.and_then(|d| d.get("icon")).and_then(|icon| match icon {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => owned(obj, "name"),
        _ => None,
    });
    SocialLink {
        name: first_str(data, &["name", "platform"]),
        url: first_str(data, &["url", "href"]),
        icon,
    }
}

/// The component's own map when it carries `marker`, else its `data` wrapper.
fn component_data<'a>(value: &'a Value, marker: &str) -> Option<&'a Map<String, Value>> {
    let map = value.as_object()?;
    if map.contains_key(marker) {
        return Some(map);
    }
    truthy_object(map.get("data")).or(Some(map))
}

fn first_str(map: Option<&Map<String, Value>>, keys: &[&str]) -> String {
    map.and_then(|m| keys.iter().find_map(|k| str_field(m, k)))
        .unwrap_or_default()
        .to_owned()
}

/// `menu.items`, `menu.attributes.items`, `menu.data.items` or
/// `menu.data.attributes.items`.
fn menu(section: &Map<String, Value>) -> Option<Vec<MenuItem>> {
    let menu = section.get("menu").filter(|m| truthy(m))?;
    let data = menu.get("data").filter(|d| truthy(d));
    let items = [
        menu.get("items"),
        menu.get("attributes").and_then(|a| a.get("items")),
        data.and_then(|d| d.get("items")),
        data.and_then(|d| d.get("attributes")).and_then(|a| a.get("items")),
    ]
    .into_iter()
    .flatten()
    .find(|v| truthy(v))
    .and_then(Value::as_array)
    .map_or(&[][..], Vec::as_slice);

    Some(build_menu_hierarchy(items))
}

// ── Menu hierarchy ───────────────────────────────────────────────────

struct FlatItem {
    id: String,
    title: String,
    url: String,
    order: i64,
    parent_order: Option<i64>,
}

/// Build the navigation tree from flat menu-item components.
///
/// Items sort by `order`, then `id`. An item attaches to the first other
/// item whose `order` equals its `parentOrder`; an unmatched or missing
/// `parentOrder` makes it a root. Items caught in a parent cycle are
/// promoted to roots rather than dropped.
pub fn build_menu_hierarchy(items: &[Value]) -> Vec<MenuItem> {
    let mut flat: Vec<FlatItem> = items
        .iter()
        .enumerate()
        .map(|(index, item)| flatten_menu_item(item, index))
        .collect();
    flat.sort_by(|a, b| match a.order.cmp(&b.order) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    let mut roots = Vec::new();
    for (index, item) in flat.iter().enumerate() {
        let parent = item.parent_order.and_then(|parent_order| {
            (0..flat.len()).find(|&other| other != index && flat[other].order == parent_order)
        });
        match parent {
            Some(parent) => children[parent].push(index),
            None => roots.push(index),
        }
    }

    let mut seen = vec![false; flat.len()];
    let mut built: Vec<(usize, MenuItem)> = Vec::with_capacity(roots.len());
    for root in roots.into_iter().chain(0..flat.len()) {
        if !seen[root] {
            built.push((root, build_node(root, &flat, &children, &mut seen)));
        }
    }
    built.sort_by_key(|(index, _)| *index);
    built.into_iter().map(|(_, item)| item).collect()
}

fn build_node(index: usize, flat: &[FlatItem], children: &[Vec<usize>], seen: &mut [bool]) -> MenuItem {
    seen[index] = true;
    let mut nested = Vec::with_capacity(children[index].len());
    for &child in &children[index] {
        if !seen[child] {
            nested.push(build_node(child, flat, children, seen));
        }
    }
    let item = &flat[index];
    MenuItem {
        id: item.id.clone(),
        title: item.title.clone(),
        url: item.url.clone(),
        order: item.order,
        children: nested,
    }
}

fn flatten_menu_item(item: &Value, index: usize) -> FlatItem {
    let empty = Map::new();
    let outer = item.as_object().unwrap_or(&empty);
    let data = truthy_object(outer.get("attributes")).unwrap_or(outer);

    let mut title = owned(data, "title");
    let url = if let Some(page) = linked_entity(data.get("page")) {
        let slug = str_field(page, "slug");
        let page_title = str_field(page, "title");
        let is_home = page_title.is_some_and(|t| t.eq_ignore_ascii_case("home"))
            || matches!(slug, None | Some("home" | "homepage"));
        title = title.or_else(|| page_title.map(str::to_owned));
        match slug {
            Some(slug) if !is_home => format!("/{slug}"),
            _ => "/".to_owned(),
        }
    } else if let Some(property) = linked_entity(data.get("property")) {
        title = title.or_else(|| owned(property, "title"));
        str_field(property, "slug").map_or_else(|| "#".to_owned(), |slug| format!("/properties/{slug}"))
    } else if let Some(custom) = str_field(data, "customUrl") {
        if custom.starts_with('/') || custom.starts_with("http") {
            custom.to_owned()
        } else {
            format!("/{custom}")
        }
    } else {
        "#".to_owned()
    };

    let id = data
        .get("id")
        .filter(|id| truthy(id))
        .map_or_else(|| format!("menu-item-{index}"), |id| stringify_id(Some(id)));
    let fallback_order = i64::try_from(index).unwrap_or(i64::MAX);

    FlatItem {
        id,
        title: title.unwrap_or_else(|| "Untitled".to_owned()),
        url,
        order: integral(data.get("order")).unwrap_or(fallback_order),
        parent_order: integral(data.get("parentOrder")),
    }
}

/// Whole-number field; integral floats such as `5.0` count as integers.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn integral(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0)
            .map(|f| f as i64)
    })
}

/// A linked page or property: flat, `attributes`-wrapped, or a
/// `{data: ...}` relation. `{data: null}` counts as no link.
fn linked_entity(value: Option<&Value>) -> Option<&Map<String, Value>> {
    let map = truthy_object(value)?;
    let map = match map.get("data") {
        Some(Value::Null) => return None,
        Some(Value::Object(inner)) => inner,
        _ => map,
    };
    Some(truthy_object(map.get("attributes")).unwrap_or(map))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn base() -> BaseUrl {
        BaseUrl::new("http://cms.local")
    }

    fn ids(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn hierarchy_sorts_and_nests() {
        let items = [
            json!({ "id": "a", "order": 2, "parentOrder": null }),
            json!({ "id": "b", "order": 1, "parentOrder": 2 }),
            json!({ "id": "c", "order": 0, "parentOrder": null }),
        ];
        let menu = build_menu_hierarchy(&items);
        assert_eq!(ids(&menu), ["c", "a"]);
        assert_eq!(ids(&menu[1].children), ["b"]);
        assert!(menu[0].children.is_empty());
    }

    #[test]
    fn orphan_parent_becomes_root() {
        let items = [
            json!({ "id": "x", "order": 1 }),
            json!({ "id": "orphan", "order": 2, "parentOrder": 99 }),
        ];
        let menu = build_menu_hierarchy(&items);
        assert_eq!(ids(&menu), ["x", "orphan"]);
    }

    #[test]
    fn equal_orders_tie_break_on_id() {
        let items = [
            json!({ "id": "zeta", "order": 1 }),
            json!({ "id": "alpha", "order": 1 }),
        ];
        assert_eq!(ids(&build_menu_hierarchy(&items)), ["alpha", "zeta"]);
    }

    #[test]
    fn missing_id_and_order_use_position() {
        let items = [json!({ "title": "First" }), json!({ "title": "Second" })];
        let menu = build_menu_hierarchy(&items);
        assert_eq!(ids(&menu), ["menu-item-0", "menu-item-1"]);
        assert_eq!(menu[1].order, 1);
    }

    #[test]
    fn grandchildren_are_kept() {
        let items = [
            json!({ "id": "root", "order": 0 }),
            json!({ "id": "child", "order": 1, "parentOrder": 0 }),
            json!({ "id": "grandchild", "order": 2, "parentOrder": 1 }),
        ];
        let menu = build_menu_hierarchy(&items);
        assert_eq!(ids(&menu), ["root"]);
        assert_eq!(ids(&menu[0].children[0].children), ["grandchild"]);
        let walked: Vec<(usize, &str)> = menu[0].walk().into_iter().map(|(d, i)| (d, i.id.as_str())).collect();
        assert_eq!(walked, [(0, "root"), (1, "child"), (2, "grandchild")]);
    }

    #[test]
    fn integral_float_orders_link_parents() {
        let items = [
            json!({ "id": "a", "order": 5.0 }),
            json!({ "id": "b", "order": 1, "parentOrder": 5.0 }),
            json!({ "id": "c", "order": 2.5, "parentOrder": 5 }),
        ];
        let menu = build_menu_hierarchy(&items);
        assert_eq!(ids(&menu), ["a"]);
        assert_eq!(menu[0].order, 5);
        assert_eq!(ids(&menu[0].children), ["b", "c"]);
        assert_eq!(menu[0].children[1].order, 2);
    }

    #[test]
    fn parent_cycle_promotes_to_root() {
        let items = [
            json!({ "id": "p", "order": 1, "parentOrder": 2 }),
            json!({ "id": "q", "order": 2, "parentOrder": 1 }),
        ];
        let menu = build_menu_hierarchy(&items);
        assert_eq!(ids(&menu), ["p"]);
        assert_eq!(ids(&menu[0].children), ["q"]);
    }

    #[test]
    fn self_parent_is_root() {
        let items = [json!({ "id": "s", "order": 3, "parentOrder": 3 })];
        let menu = build_menu_hierarchy(&items);
        assert_eq!(ids(&menu), ["s"]);
        assert!(menu[0].children.is_empty());
    }

    #[test]
    fn home_page_links_to_root() {
        let cases = [
            (json!({ "slug": "" }), "/"),
            (json!({ "slug": "home" }), "/"),
            (json!({ "slug": "homepage" }), "/"),
            (json!({ "slug": "welcome", "title": "Home" }), "/"),
            (json!({ "title": "No slug" }), "/"),
            (json!({ "slug": "about", "title": "About" }), "/about"),
            (json!({ "data": { "id": 3, "attributes": { "slug": "about" } } }), "/about"),
        ];
        for (page, expected) in cases {
            let menu = build_menu_hierarchy(&[json!({ "id": "1", "order": 0, "page": page })]);
            assert_eq!(menu[0].url, expected, "{page}");
        }
    }

    #[test]
    fn url_priority_and_titles() {
        let items = [
            json!({ "id": "1", "order": 0, "page": { "slug": "about", "title": "About Us" } }),
            json!({ "id": "2", "order": 1, "title": "Villa", "property": { "slug": "villa" } }),
            json!({ "id": "3", "order": 2, "property": { "title": "No slug" } }),
            json!({ "id": "4", "order": 3, "title": "Blog", "customUrl": "blog" }),
            json!({ "id": "5", "order": 4, "title": "Ext", "customUrl": "https://x.example" }),
            json!({ "id": "6", "order": 5 }),
            json!({ "id": "7", "order": 6, "page": { "data": null }, "customUrl": "/fallback" }),
        ];
        let menu = build_menu_hierarchy(&items);
        let got: Vec<(&str, &str)> = menu.iter().map(|i| (i.title.as_str(), i.url.as_str())).collect();
        assert_eq!(
            got,
            [
                ("About Us", "/about"),
                ("Villa", "/properties/villa"),
                ("No slug", "#"),
                ("Blog", "/blog"),
                ("Ext", "https://x.example"),
                ("Untitled", "#"),
                ("Untitled", "/fallback"),
            ]
        );
    }

    #[test]
    fn duplicate_ids_are_not_collapsed() {
        let items = [json!({ "id": "dup", "order": 0 }), json!({ "id": "dup", "order": 1 })];
        assert_eq!(build_menu_hierarchy(&items).len(), 2);
    }

    #[test]
    fn global_options_from_nested_response() {
        let response = json!({ "data": { "id": 1, "attributes": {
            "site": { "siteName": "Realty", "siteUrl": "https://realty.example", "favicon": { "data": { "attributes": { "url": "/fav.ico" } } } },
            "header": {
                "logo": { "url": "/logo.svg", "alternativeText": "Realty" },
                "logoText": "Realty",
                "menu": { "data": { "attributes": { "items": [
                    { "id": 10, "order": 0, "page": { "data": { "id": 1, "attributes": { "slug": "home", "title": "Home" } } } },
                    { "id": 11, "order": 1, "page": { "data": { "id": 2, "attributes": { "slug": "about", "title": "About" } } } },
                ] } } },
                "links": [{ "label": "Call", "href": "tel:123" }, { "data": { "text": "Mail", "url": "mailto:a@b" } }],
            },
            "footer": {
                "copyright": "© Realty",
                "socialMedia": [{ "platform": "instagram", "href": "https://ig.example", "icon": "instagram" }],
                "menu": { "items": [{ "title": "Privacy", "customUrl": "privacy" }] },
            },
        } } });

        let options = normalize_global_options(&response, &base()).unwrap();
        assert_eq!(options.id, "1");

        let site = options.site.unwrap();
        assert_eq!(site.site_name, "Realty");
        assert_eq!(site.favicon.unwrap().url, "http://cms.local/fav.ico");

        let header = options.header.unwrap();
        assert_eq!(header.logo.unwrap().alt.as_deref(), Some("Realty"));
        let menu = header.menu.unwrap();
        assert_eq!(
            menu.iter().map(|i| (i.id.as_str(), i.url.as_str())).collect::<Vec<_>>(),
            [("10", "/"), ("11", "/about")]
        );
        assert_eq!(
            header.links,
            [
                Link { text: "Call".into(), url: "tel:123".into() },
                Link { text: "Mail".into(), url: "mailto:a@b".into() },
            ]
        );

        let footer = options.footer.unwrap();
        assert!(footer.links.is_empty());
        let social = footer.social_media.unwrap();
        assert_eq!(social[0].name, "instagram");
        assert_eq!(social[0].icon.as_deref(), Some("instagram"));
        assert_eq!(footer.menu.unwrap()[0].url, "/privacy");
    }

    #[test]
    fn header_alone_is_enough() {
        let response = json!({ "data": { "id": 2, "header": { "logoText": "R" } } });
        let options = normalize_global_options(&response, &base()).unwrap();
        assert!(options.footer.is_none());
        let header = options.header.unwrap();
        assert_eq!(header.menu, None);
        assert!(header.links.is_empty());
    }

    #[test]
    fn missing_header_and_footer_is_none() {
        for response in [
            json!({ "data": null }),
            json!({ "data": { "id": 1, "attributes": { "site": { "siteName": "x" } } } }),
            json!({ "data": { "id": 1, "header": null, "footer": null } }),
            json!({}),
        ] {
            assert_eq!(normalize_global_options(&response, &base()), None, "{response}");
        }
    }
}
