//! Attribute and URL escaping for generated anchors

use url::Url;

/// Schemes allowed in a generated href
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto"];

/// Escape text for use inside a double-quoted HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Sanitise a URL for an href attribute.
///
/// Returns `None` for schemes outside [`ALLOWED_SCHEMES`] (`javascript:`,
/// `data:` and friends) and for URLs that are blank or carry control
/// characters. Relative URLs pass through.
pub fn sanitize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() || url.chars().any(char::is_control) {
        return None;
    }
    match Url::parse(url) {
        Ok(parsed) if !ALLOWED_SCHEMES.contains(&parsed.scheme()) => None,
        _ => Some(escape_attr(url)),
    }
}
