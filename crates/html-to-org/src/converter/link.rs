//! Link normalization for `href`, `src` and form `action` values.

use url::Url;

use super::anchors::fragment_name;
use crate::error::{ConversionError, Result};
use crate::options::ConversionOptions;

/// Resolve a raw link attribute into the target written between `[[` and `]]`.
///
/// - empty input stays empty
/// - a bare `#name` reference becomes `name`, the Org internal link form
/// - long data URLs are shortened unless full display is enabled
/// - everything else is trimmed, stripped of embedded line breaks and, when a
///   base URL is configured, resolved against it
///
/// # Errors
///
/// Returns [`ConversionError::InvalidBaseUrl`] when the base URL is not
/// absolute, and [`ConversionError::InvalidUrl`] when the link cannot be
/// resolved even after dropping a malformed percent-escape.
pub fn normalize_link(raw: &str, options: &ConversionOptions) -> Result<String> {
    let link = raw.trim();
    if link.is_empty() {
        return Ok(String::new());
    }

    if let Some(name) = fragment_name(link) {
        return Ok(name.to_string());
    }

    if is_data_url(link) && !options.show_full_data_urls && link.len() > options.data_url_max_length {
        log::debug!("shortening data URL of {} bytes", link.len());
        return Ok(shorten_data_url(link));
    }

    let link = link.replace(['\n', '\r'], "");
    match options.base_url() {
        Some(base) => resolve_against(base, &link),
        None => Ok(link),
    }
}

fn resolve_against(base: &str, link: &str) -> Result<String> {
    let base_url = Url::parse(base).map_err(|source| ConversionError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;

    let target = match invalid_escape_offset(link) {
        Some(offset) => {
            log::debug!("dropping malformed percent-escape in {link:?} at byte {offset}");
            &link[..offset]
        }
        None => link,
    };

    let mut resolved = base_url.join(target).map_err(|source| ConversionError::InvalidUrl {
        url: link.to_string(),
        source,
    })?;

    if resolved.fragment() == Some("") {
        resolved.set_fragment(None);
    }
    if resolved.query() == Some("") {
        resolved.set_query(None);
    }

    Ok(resolved.into())
}

/// Byte offset of the first `%` not followed by two hex digits.
fn invalid_escape_offset(link: &str) -> Option<usize> {
    let bytes = link.as_bytes();
    bytes.iter().enumerate().find_map(|(idx, &byte)| {
        if byte != b'%' {
            return None;
        }
        let valid = bytes.get(idx + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(idx + 2).is_some_and(u8::is_ascii_hexdigit);
        (!valid).then_some(idx)
    })
}

fn is_data_url(link: &str) -> bool {
    link.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

fn shorten_data_url(link: &str) -> String {
    match link.find(';') {
        Some(idx) => format!("{};(omitted)", &link[..idx]),
        None => "data:(omitted)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_base(base: &str) -> ConversionOptions {
        ConversionOptions::default().with_base_url(base)
    }

    #[test]
    fn empty_and_fragment_links() {
        let options = with_base("http://example.com/");
        assert_eq!(normalize_link("", &options).unwrap(), "");
        assert_eq!(normalize_link("   ", &options).unwrap(), "");
        assert_eq!(normalize_link("#section-2", &options).unwrap(), "section-2");
    }

    #[test]
    fn passes_through_without_base() {
        let options = ConversionOptions::default();
        assert_eq!(normalize_link("  %%LINK%%  ", &options).unwrap(), "%%LINK%%");
        assert_eq!(normalize_link("/\n\t\tbar/baz", &options).unwrap(), "/\t\tbar/baz");
    }

    #[test]
    fn resolves_relative_references() {
        let options = with_base("http://example.com/foo/");
        assert_eq!(normalize_link("./bar/", &options).unwrap(), "http://example.com/foo/bar/");
        assert_eq!(normalize_link("../", &options).unwrap(), "http://example.com/");
        assert_eq!(normalize_link("hello.jpg", &options).unwrap(), "http://example.com/foo/hello.jpg");
        assert_eq!(
            normalize_link("mailto:contact@example.org", &options).unwrap(),
            "mailto:contact@example.org"
        );
    }

    #[test]
    fn recovers_from_bad_percent_escape() {
        let options = with_base("https://mitpress.mit.edu");
        assert_eq!(
            normalize_link("book-Z-H-4.html#%_toc_start", &options).unwrap(),
            "https://mitpress.mit.edu/book-Z-H-4.html"
        );
    }

    #[test]
    fn rejects_relative_base() {
        let options = with_base("not a base");
        let err = normalize_link("page.html", &options).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn shortens_long_data_urls() {
        let payload = "A".repeat(200);
        let options = ConversionOptions::default();
        assert_eq!(
            normalize_link(&format!("data:image/png;base64,{payload}"), &options).unwrap(),
            "data:image/png;(omitted)"
        );
        assert_eq!(normalize_link(&format!("data:{payload}"), &options).unwrap(), "data:(omitted)");

        let short = "data:text/plain;base64,SGk=";
        assert_eq!(normalize_link(short, &options).unwrap(), short);

        let full = ConversionOptions::default().with_show_full_data_urls(true);
        let long = format!("data:image/png;base64,{payload}");
        assert_eq!(normalize_link(&long, &full).unwrap(), long);
    }

    #[test]
    fn escape_offset_detection() {
        assert_eq!(invalid_escape_offset("a%20b"), None);
        assert_eq!(invalid_escape_offset("a%2"), Some(1));
        assert_eq!(invalid_escape_offset("x#%_t"), Some(2));
    }
}
