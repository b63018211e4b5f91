//! Presentation helpers for rendered templates.
//!
//! Templates use a literal `<br>` as their line-break convention. The
//! renderer treats it as opaque text; these helpers turn it into lines for
//! display and into newlines for the clipboard.

use once_cell::sync::Lazy;
use regex::Regex;

const LINE_BREAK: &str = "<br>";

static BR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br pattern is valid"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Split on `<br>`, keeping empty segments so consecutive breaks show as
/// blank lines. Each segment must be displayed as plain text.
pub fn preview_lines(rendered: &str) -> Vec<&str> {
    rendered.split(LINE_BREAK).collect()
}

/// Clipboard form: `<br>` variants become `\n`, any other tag is dropped.
pub fn to_plain_text(rendered: &str) -> String {
    let with_newlines = BR_TAG.replace_all(rendered, "\n");
    ANY_TAG.replace_all(&with_newlines, "").into_owned()
}
