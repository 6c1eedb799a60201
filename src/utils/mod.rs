//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip one layer of straight or curly quotes around a title.
pub fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix(['"', '\u{201C}', '\u{2018}', '\''])
        .and_then(|rest| rest.strip_suffix(['"', '\u{201D}', '\u{2019}', '\'']));
    inner.unwrap_or(trimmed).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://pitchfork.com/reviews/best/albums/").unwrap();
        assert_eq!(
            resolve_url(&base, "/reviews/albums/rtj4/"),
            "https://pitchfork.com/reviews/albums/rtj4/"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Run \n the\tJewels "), "Run the Jewels");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("“Dark Red”"), "Dark Red");
        assert_eq!(strip_quotes("\"Ooh La La\""), "Ooh La La");
        assert_eq!(strip_quotes("No Quotes"), "No Quotes");
    }
}
