//! Utility functions and helpers.

pub mod http;
pub mod url;

use ::url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://filmarks.com/").unwrap();
        assert_eq!(
            resolve_url(&base, "/list-drama/year/2000s/2007"),
            "https://filmarks.com/list-drama/year/2000s/2007"
        );
        assert_eq!(
            resolve_url(&base, "dramas/6055/8586"),
            "https://filmarks.com/dramas/6055/8586"
        );
        assert_eq!(
            resolve_url(&base, "https://d2ueuvlup6lbue.cloudfront.net/x.jpg"),
            "https://d2ueuvlup6lbue.cloudfront.net/x.jpg"
        );
    }
}
