//! Catalog of template variables the extractor can populate, for UI hints.
//!
//! Paths are derived from raw tag names with the extractor's own key rules,
//! so the catalog and the extractor share one key space.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::extractor::{meta_key, og_key};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    #[serde(rename = "key")]
    pub path: String,
    pub description: &'static str,
}

/// Where a catalog entry's value comes from.
#[derive(Debug, Clone, Copy)]
enum Source {
    /// A top-level `PageRecord` field.
    Page(&'static str),
    /// `<meta name=...>` or a non-OGP `<meta property=...>`.
    Meta(&'static str),
    /// `<meta property="og:*">` or a `twitter:*` tag.
    OpenGraph(&'static str),
}

impl Source {
    fn path(self) -> String {
        match self {
            Source::Page(field) => field.to_string(),
            Source::Meta(raw) => format!("meta.{}", meta_key(raw)),
            Source::OpenGraph(raw) => format!("og.{}", og_key(raw)),
        }
    }
}

const SOURCES: &[(Source, &str)] = &[
    (Source::Page("title"), "Page title"),
    (Source::Page("url"), "Page URL"),
    (Source::Page("domain"), "Domain part of the URL"),
    (Source::Meta("description"), "Meta description"),
    (Source::Meta("keywords"), "Meta keywords"),
    (Source::Meta("author"), "Meta author"),
    (Source::Meta("date"), "Meta date"),
    (Source::Meta("copyright"), "Meta copyright"),
    (Source::Meta("language"), "Meta language"),
    (Source::Meta("robots"), "Meta robots directives"),
    (Source::Meta("generator"), "Meta generator"),
    (Source::Meta("fediverse:creator"), "Fediverse creator (fediverse:creator)"),
    (Source::Meta("article:published_time"), "Article published time (article:published_time)"),
    (Source::Meta("article:author"), "Article author (article:author)"),
    (Source::OpenGraph("og:title"), "OG title"),
    (Source::OpenGraph("og:description"), "OG description"),
    (Source::OpenGraph("og:url"), "OG URL"),
    (Source::OpenGraph("og:image"), "OG image URL"),
    (Source::OpenGraph("og:site_name"), "OG site name"),
    (Source::OpenGraph("og:type"), "OG type"),
    (Source::OpenGraph("og:locale"), "OG locale"),
    (Source::OpenGraph("twitter:card"), "Twitter card type"),
    (Source::OpenGraph("twitter:site"), "Twitter site"),
    (Source::OpenGraph("twitter:creator"), "Twitter creator"),
    (Source::OpenGraph("twitter:title"), "Twitter title"),
    (Source::OpenGraph("twitter:description"), "Twitter description"),
    (Source::OpenGraph("twitter:image"), "Twitter image URL"),
];

static CATALOG: Lazy<Vec<Variable>> = Lazy::new(|| {
    SOURCES
        .iter()
        .map(|&(source, description)| Variable {
            path: source.path(),
            description,
        })
        .collect()
});

pub fn available_variables() -> &'static [Variable] {
    &CATALOG
}

// ── Templates ──────────────────────────────────────────────────────────────

/// Template used until the user saves their own.
pub const DEFAULT_TEMPLATE: &str = "{{ title }}<br>{{ url }}";

/// A ready-made template shown as a starting point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExampleTemplate {
    pub label: &'static str,
    pub template: &'static str,
}

pub const EXAMPLE_TEMPLATES: &[ExampleTemplate] = &[
    ExampleTemplate {
        label: "Basic info",
        template: "{{ title }}、{{ url }}、{{ domain }}",
    },
    ExampleTemplate {
        label: "Meta tags",
        template: "{{ meta.description }}、{{ meta.keywords }}、{{ meta.author }}",
    },
    ExampleTemplate {
        label: "OGP info",
        template: "{{ og.title }}、{{ og.description }}、{{ og.url }}、{{ og.site_name }}",
    },
    ExampleTemplate {
        label: "Twitter Card",
        template: "{{ og.twitter_card }}、{{ og.twitter_site }}",
    },
];
