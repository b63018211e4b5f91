use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// ============================================================================
// Document Models
// ============================================================================

/// One `<meta>` element, with its raw attribute values.
///
/// Attributes that are not present on the element are `None`; the extractor
/// treats an empty attribute the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaElement {
    pub name: Option<String>,
    pub property: Option<String>,
    pub content: Option<String>,
}

impl MetaElement {
    pub fn named(name: &str, content: &str) -> Self {
        MetaElement {
            name: Some(name.to_string()),
            property: None,
            content: Some(content.to_string()),
        }
    }

    pub fn property(property: &str, content: &str) -> Self {
        MetaElement {
            name: None,
            property: Some(property.to_string()),
            content: Some(content.to_string()),
        }
    }
}

/// Read-only view of a document: everything the extractor is allowed to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub title: String,
    pub url: String,
    pub domain: String,
    /// Meta elements in document order.
    pub meta_elements: Vec<MetaElement>,
}

// ============================================================================
// Page Record Models
// ============================================================================

/// Open Graph and Twitter Card properties keyed by normalized name.
///
/// `og:title` is stored as `title`, `twitter:card` as `twitter_card`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OgRecord(BTreeMap<String, String>);

impl OgRecord {
    /// Keys a typical page populates. Any other normalized `og:*` or
    /// `twitter:*` property may also appear.
    pub const WELL_KNOWN_KEYS: [&'static str; 13] = [
        "title",
        "description",
        "url",
        "image",
        "site_name",
        "type",
        "locale",
        "twitter_card",
        "twitter_site",
        "twitter_creator",
        "twitter_title",
        "twitter_description",
        "twitter_image",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Stores `value` under `key`, replacing any earlier value.
    pub fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OgRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        OgRecord(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Structured snapshot of a page's extractable metadata.
///
/// The field names are what user templates refer to (`{{ og.title }}`,
/// `{{ meta.description }}`), so renaming any of them breaks saved templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    pub domain: String,
    #[serde(default)]
    pub og: OgRecord,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

// ============================================================================
// Page Info Sections
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Basic,
    Meta,
    OpenGraph,
    TwitterCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoEntry {
    pub key: String,
    pub value: String,
}

impl InfoEntry {
    fn new(key: String, value: &str) -> Self {
        InfoEntry {
            key,
            value: value.to_string(),
        }
    }
}

/// A labelled group of template paths and their values, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoSection {
    pub kind: SectionKind,
    pub entries: Vec<InfoEntry>,
}

impl PageRecord {
    /// Groups the record into display sections. `Basic` is always present;
    /// the others only when they have entries.
    pub fn sections(&self) -> Vec<InfoSection> {
        let mut sections = vec![InfoSection {
            kind: SectionKind::Basic,
            entries: vec![
                InfoEntry::new("title".into(), &self.title),
                InfoEntry::new("url".into(), &self.url),
                InfoEntry::new("domain".into(), &self.domain),
            ],
        }];

        let meta: Vec<InfoEntry> = self
            .meta
            .iter()
            .map(|(k, v)| InfoEntry::new(format!("meta.{k}"), v))
            .collect();

        let (twitter, open_graph): (Vec<_>, Vec<_>) = self
            .og
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| InfoEntry::new(format!("og.{k}"), v))
            .partition(|e| e.key.starts_with("og.twitter_"));

        for (kind, entries) in [
            (SectionKind::Meta, meta),
            (SectionKind::OpenGraph, open_graph),
            (SectionKind::TwitterCard, twitter),
        ] {
            if !entries.is_empty() {
                sections.push(InfoSection { kind, entries });
            }
        }

        sections
    }
}

// ============================================================================
// API Models
// ============================================================================

pub const MAX_TEMPLATE_BYTES: usize = 64 * 1024;
pub const MAX_HTML_BYTES: usize = 5 * 1024 * 1024;

// `length` counts chars, so the byte limits need their own checks.
fn max_bytes(value: &str, max: usize, message: &'static str) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::new("max_bytes").with_message(Cow::Borrowed(message)));
    }
    Ok(())
}

fn template_size(template: &str) -> Result<(), ValidationError> {
    max_bytes(template, MAX_TEMPLATE_BYTES, "template must be at most 64 KiB")
}

fn html_size(html: &str) -> Result<(), ValidationError> {
    max_bytes(html, MAX_HTML_BYTES, "html must be at most 5 MiB")
}

#[derive(Debug, Deserialize)]
pub struct PageInfoQuery {
    pub url: String,
}

/// Body of `POST /page-info`: extract from caller-supplied HTML.
#[derive(Debug, Deserialize, Validate)]
pub struct ExtractHtmlRequest {
    #[validate(url(message = "url must be an absolute URL"))]
    pub url: String,
    #[validate(custom(function = "html_size"))]
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfoDto {
    pub record: PageRecord,
    pub sections: Vec<InfoSection>,
}

impl From<PageRecord> for PageInfoDto {
    fn from(record: PageRecord) -> Self {
        let sections = record.sections();
        PageInfoDto { record, sections }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenderRequest {
    #[validate(custom(function = "template_size"))]
    pub template: String,
    pub record: PageRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderDto {
    pub rendered: String,
    pub variables: Vec<String>,
    /// `rendered` split on the `<br>` line-break convention.
    pub lines: Vec<String>,
    /// Clipboard form of `rendered`.
    pub plain_text: String,
}
