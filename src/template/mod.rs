//! `{{ path }}` placeholder substitution against a [`PageRecord`].
//!
//! The grammar is a persisted format: saved templates rely on it, so it must
//! stay backward compatible. A placeholder is `{{`, optional whitespace, one
//! or more of `[A-Za-z0-9._]`, optional whitespace, `}}`. Anything else is
//! literal text.
//!
//! "Whitespace" is the ECMAScript set, which templates were
//! written against. It is not Unicode `White_Space`: U+0085 is literal here
//! while U+FEFF counts as a space.

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::PageRecord;

/// ECMAScript `WhiteSpace` plus `LineTerminator` as a regex class.
const SPACE: &str = r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\{{\{{{SPACE}*([A-Za-z0-9._]+){SPACE}*\}}\}}"))
        .expect("placeholder pattern is valid")
});

/// Outcome of resolving a dotted path against a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a str),
    Missing,
}

enum Node<'a> {
    Root(&'a PageRecord),
    Map(&'a BTreeMap<String, String>),
    Leaf(&'a str),
}

impl PageRecord {
    /// Resolve `path` (e.g. `og.title`) one segment at a time.
    ///
    /// Only string leaves are found; a path that stops on `og` or `meta`
    /// itself, or continues past a leaf, is missing.
    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        let mut node = Node::Root(self);

        for segment in path.split('.') {
            node = match node {
                Node::Root(record) => match segment {
                    "title" => Node::Leaf(&record.title),
                    "url" => Node::Leaf(&record.url),
                    "domain" => Node::Leaf(&record.domain),
                    "og" => Node::Map(record.og.as_map()),
                    "meta" => Node::Map(&record.meta),
                    _ => return Lookup::Missing,
                },
                Node::Map(map) => match map.get(segment) {
                    Some(value) => Node::Leaf(value),
                    None => return Lookup::Missing,
                },
                Node::Leaf(_) => return Lookup::Missing,
            };
        }

        match node {
            Node::Leaf(value) => Lookup::Found(value),
            Node::Root(_) | Node::Map(_) => Lookup::Missing,
        }
    }
}

/// Substitute every placeholder whose path resolves to a non-empty value.
///
/// Unresolved or empty placeholders are left exactly as written so the user
/// can see what did not match. No escaping is applied: callers embedding the
/// result in markup must escape it themselves.
pub fn render(template: &str, record: &PageRecord) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match record.lookup(&caps[1]) {
            Lookup::Found(value) if !value.is_empty() => value.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder paths in order of first appearance.
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|path| seen.insert(*path))
        .map(str::to_string)
        .collect()
}

/// `true` if `text` is exactly one placeholder.
#[cfg(test)]
pub(crate) fn is_placeholder(text: &str) -> bool {
    PLACEHOLDER
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OgRecord;
    use proptest::prelude::*;

    fn record() -> PageRecord {
        PageRecord {
            title: "Hello".into(),
            url: "https://x.test/a".into(),
            domain: "x.test".into(),
            og: OgRecord::new(),
            meta: BTreeMap::new(),
        }
    }

    // ── Lookup ──────────────────────────────────────────────────────────────

    #[test]
    fn lookup_root_fields() {
        let r = record();
        assert_eq!(r.lookup("title"), Lookup::Found("Hello"));
        assert_eq!(r.lookup("domain"), Lookup::Found("x.test"));
    }

    #[test]
    fn lookup_nested_fields() {
        let mut r = record();
        r.og.insert("title".into(), "OG".into());
        r.meta.insert("author".into(), "Ann".into());
        assert_eq!(r.lookup("og.title"), Lookup::Found("OG"));
        assert_eq!(r.lookup("meta.author"), Lookup::Found("Ann"));
    }

    #[test]
    fn lookup_missing_paths() {
        let r = record();
        for path in [
            "nope",
            "og",
            "meta",
            "meta.missing",
            "title.length",
            "og.title.x",
            ".title",
            "title.",
            "og..title",
        ] {
            assert_eq!(r.lookup(path), Lookup::Missing, "path {path}");
        }
    }

    #[test]
    fn lookup_keeps_dotted_keys_unreachable_past_first_segment() {
        let mut r = record();
        r.meta.insert("a.b".into(), "v".into());
        assert_eq!(r.lookup("meta.a.b"), Lookup::Missing);
    }

    // ── Render ──────────────────────────────────────────────────────────────

    #[test]
    fn renders_title_and_url_around_br() {
        assert_eq!(
            render("{{ title }}<br>{{ url }}", &record()),
            "Hello<br>https://x.test/a"
        );
    }

    #[test]
    fn missing_meta_key_is_left_unchanged() {
        assert_eq!(
            render("{{ meta.missing }}", &record()),
            "{{ meta.missing }}"
        );
    }

    #[test]
    fn renders_twitter_card() {
        let mut r = record();
        r.og.insert("twitter_card".into(), "summary".into());
        assert_eq!(render("Card: {{ og.twitter_card }}", &r), "Card: summary");
    }

    #[test]
    fn empty_value_leaves_placeholder_byte_for_byte() {
        let mut r = record();
        r.title = String::new();
        assert_eq!(render("[{{   title}}]", &r), "[{{   title}}]");
    }

    #[test]
    fn whitespace_inside_braces_is_optional() {
        assert_eq!(render("{{title}}|{{ \ttitle\n }}", &record()), "Hello|Hello");
    }

    #[test]
    fn unicode_spaces_inside_braces_are_accepted() {
        for space in ['\u{A0}', '\u{2003}', '\u{2028}', '\u{3000}', '\u{FEFF}'] {
            let text = format!("{{{{{space}title{space}}}}}");
            assert_eq!(render(&text, &record()), "Hello", "{:?}", space);
        }
    }

    #[test]
    fn next_line_is_not_a_space() {
        let text = "{{\u{85}title}}";
        assert_eq!(render(text, &record()), text);
        assert!(extract_variables(text).is_empty());
    }

    #[test]
    fn malformed_placeholders_pass_through() {
        let text = "{{ }} {{title {title} {{ ti-tle }} {{ og:title }} {{{{";
        assert_eq!(render(text, &record()), text);
    }

    #[test]
    fn triple_braces_substitute_inner_placeholder() {
        assert_eq!(render("{{{ title }}}", &record()), "{Hello}");
    }

    #[test]
    fn values_are_not_rescanned_or_escaped() {
        let mut r = record();
        r.title = "<b>{{ url }}</b> & co".into();
        assert_eq!(render("{{ title }}", &r), "<b>{{ url }}</b> & co");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        assert_eq!(render("{{ domain }}/{{ domain }}", &record()), "x.test/x.test");
    }

    #[test]
    fn multibyte_text_passes_through() {
        assert_eq!(
            render("タイトル：{{ title }}、{{ domain }}", &record()),
            "タイトル：Hello、x.test"
        );
    }

    // ── Variables ───────────────────────────────────────────────────────────

    #[test]
    fn extract_variables_deduplicates_in_first_seen_order() {
        assert_eq!(extract_variables("{{a}} {{b}} {{a}}"), vec!["a", "b"]);
    }

    #[test]
    fn extract_variables_strips_whitespace() {
        assert_eq!(
            extract_variables("{{ og.title }} {{og.title}} {{  meta.description }}"),
            vec!["og.title", "meta.description"]
        );
    }

    #[test]
    fn extract_variables_without_placeholders_is_empty() {
        assert!(extract_variables("plain text {{ not valid! }}").is_empty());
    }

    #[test]
    fn is_placeholder_requires_whole_string() {
        assert!(is_placeholder("{{ og.title }}"));
        assert!(!is_placeholder(" {{ og.title }}"));
        assert!(!is_placeholder("{{ og:title }}"));
    }

    proptest! {
        #[test]
        fn text_without_placeholders_is_unchanged(text in "[^{}]{0,64}") {
            prop_assert_eq!(render(&text, &record()), text);
        }

        #[test]
        fn extract_variables_is_deterministic_and_distinct(
            text in "(\\{\\{ ?[a-c.]{1,3} ?\\}\\}|[a-z ]{0,4}){0,10}"
        ) {
            let first = extract_variables(&text);
            prop_assert_eq!(&first, &extract_variables(&text));
            let mut sorted = first.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), first.len());
        }

        #[test]
        fn unresolvable_paths_render_verbatim(path in "zz[a-z_]{0,8}(\\.[a-z_]{1,4}){0,2}") {
            let placeholder = format!("{{{{ {path} }}}}");
            prop_assert_eq!(render(&placeholder, &record()), placeholder);
        }
    }
}
