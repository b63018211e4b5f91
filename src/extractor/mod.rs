//! Page metadata extraction.
//!
//! Turns the meta elements of a document into a [`PageRecord`]. Everything
//! here is pure: the same elements always produce the same record.

pub mod document;

use std::collections::BTreeMap;

use crate::models::{DocumentSnapshot, MetaElement, OgRecord, PageRecord};

pub use document::snapshot_from_html;

const OG_PREFIX: &str = "og:";
const TWITTER_PREFIX: &str = "twitter:";

/// Replace every character outside `[A-Za-z0-9_.]` with `_`.
///
/// Characters outside the BMP become two underscores, one per UTF-16 code
/// unit, so keys match what the browser extension produced.
pub fn normalize_property_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            out.push(c);
        } else {
            for _ in 0..c.len_utf16() {
                out.push('_');
            }
        }
    }
    out
}

/// `true` for `og:*` and `twitter:*` property names.
pub fn is_open_graph(raw: &str) -> bool {
    raw.starts_with(OG_PREFIX) || raw.starts_with(TWITTER_PREFIX)
}

/// Key under which an `og:*` / `twitter:*` tag is stored in [`OgRecord`].
///
/// `og:site_name` → `site_name`, `twitter:card` → `twitter_card`.
pub fn og_key(raw: &str) -> String {
    let stripped = raw.strip_prefix(OG_PREFIX).unwrap_or(raw);
    match stripped.strip_prefix(TWITTER_PREFIX) {
        Some(rest) => normalize_property_name(&format!("twitter_{rest}")),
        None => normalize_property_name(stripped),
    }
}

/// Key under which any other meta tag is stored in `PageRecord::meta`.
pub fn meta_key(raw: &str) -> String {
    normalize_property_name(raw)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Open Graph and Twitter Card properties.
///
/// `property="og:*"` / `property="twitter:*"` elements are read first, then
/// `name="twitter:*"` elements, each in document order. A later write to the
/// same key replaces the earlier one, so a `name`-keyed Twitter tag wins over
/// a `property`-keyed one.
pub fn extract_og(elements: &[MetaElement]) -> OgRecord {
    let mut og = OgRecord::new();

    for el in elements {
        if let (Some(property), Some(content)) = (non_empty(&el.property), non_empty(&el.content))
        {
            if is_open_graph(property) {
                og.insert(og_key(property), content.to_string());
            }
        }
    }

    for el in elements {
        if let (Some(name), Some(content)) = (non_empty(&el.name), non_empty(&el.content)) {
            if name.starts_with(TWITTER_PREFIX) {
                og.insert(og_key(name), content.to_string());
            }
        }
    }

    og
}

/// Every `name`-keyed meta tag, plus `property`-keyed tags that are not
/// Open Graph or Twitter Card properties.
pub fn extract_meta(elements: &[MetaElement]) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();

    for el in elements {
        if let (Some(name), Some(content)) = (non_empty(&el.name), non_empty(&el.content)) {
            meta.insert(meta_key(name), content.to_string());
        }
    }

    for el in elements {
        if let (Some(property), Some(content)) = (non_empty(&el.property), non_empty(&el.content))
        {
            if !is_open_graph(property) {
                meta.insert(meta_key(property), content.to_string());
            }
        }
    }

    meta
}

pub fn extract_page_record(doc: &DocumentSnapshot) -> PageRecord {
    PageRecord {
        title: doc.title.clone(),
        url: doc.url.clone(),
        domain: doc.domain.clone(),
        og: extract_og(&doc.meta_elements),
        meta: extract_meta(&doc.meta_elements),
    }
}
