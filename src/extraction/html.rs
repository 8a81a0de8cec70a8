//! Plain-text view of rich-text widget content.

use once_cell::sync::Lazy;
use regex::Regex;

// Single pass, no nesting awareness. Stray fragments from malformed markup are kept.
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").unwrap());

/// Remove every `<...>` tag and trim the result. `None` yields `""`.
pub fn strip_html_tags(html: Option<&str>) -> String {
    match html {
        Some(html) => TAG_PATTERN.replace_all(html, "").trim().to_string(),
        None => String::new(),
    }
}
