use scraper::{Html, Selector};
use url::Url;

use crate::models::{DocumentSnapshot, MetaElement};

/// Build a [`DocumentSnapshot`] from raw HTML served at `page_url`.
///
/// Never fails: malformed markup is handled by the HTML parser and an
/// unparsable URL yields an empty domain.
pub fn snapshot_from_html(html: &str, page_url: &str) -> DocumentSnapshot {
    let document = Html::parse_document(html);

    DocumentSnapshot {
        title: get_title(&document),
        url: page_url.to_string(),
        domain: hostname(page_url),
        meta_elements: get_meta_elements(&document),
    }
}

fn get_meta_elements(doc: &Html) -> Vec<MetaElement> {
    let Ok(selector) = Selector::parse("meta") else {
        return Vec::new();
    };
    doc.select(&selector)
        .map(|el| {
            let attr = |name: &str| el.value().attr(name).map(str::to_string);
            MetaElement {
                name: attr("name"),
                property: attr("property"),
                content: attr("content"),
            }
        })
        .collect()
}

/// Text of the first `<title>`, with ASCII whitespace stripped and collapsed
/// the way browsers compute `document.title`.
fn get_title(doc: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_ascii_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

fn hostname(page_url: &str) -> String {
    Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}
