// src/utils/url.rs

//! URL manipulation utilities.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// Parse the last non-empty path segment of a URL as a numeric id.
///
/// # Examples
/// ```
/// use markuapi::utils::url::trailing_id;
/// use url::Url;
///
/// let url = Url::parse("https://filmarks.com/people/175097").unwrap();
/// assert_eq!(trailing_id(&url), Some(175097));
/// ```
pub fn trailing_id(url: &Url) -> Option<u64> {
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()?
        .parse()
        .ok()
}

/// Decade path segment for a year listing (`2007` -> `2000s`).
pub fn decade_segment(year: u32) -> String {
    format!("{}s", year / 10 * 10)
}

/// Names of `{name}` placeholders in a path template, in order.
pub fn placeholders(template: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Regex matching a single well-formed placeholder.
pub(crate) fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"))
}
