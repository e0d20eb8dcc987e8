//! URL normalization for embed candidates.

use url::Url;

/// Turn raw paragraph text into an absolute URL.
///
/// Strings that do not start with `http` are treated as scheme-less and get
/// an `https://` prefix. The result is the WHATWG-canonical form, so
/// `example.com` becomes `https://example.com/`. Anything that does not parse
/// yields `None`; callers skip such paragraphs silently.
///
/// # Example
///
/// ```
/// use embedder::url::normalize_url;
///
/// let url = normalize_url("youtu.be/dQw4w9WgXcQ").unwrap();
/// assert_eq!(url.as_str(), "https://youtu.be/dQw4w9WgXcQ");
///
/// assert!(normalize_url("not a url").is_none());
/// ```
pub fn normalize_url(raw: &str) -> Option<Url> {
    let parsed = if raw.starts_with("http") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{raw}"))
    };

    match parsed {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Skipping {raw:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_is_canonicalized() {
        let url = normalize_url("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_scheme_less_gets_https() {
        let url = normalize_url("codesandbox.io/s/abc?file=/index.js").unwrap();
        assert_eq!(url.as_str(), "https://codesandbox.io/s/abc?file=/index.js");
    }

    #[test]
    fn test_plain_http_is_kept() {
        let url = normalize_url("http://example.com/a").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_text_with_spaces_is_rejected() {
        assert!(normalize_url("hello world").is_none());
    }

    #[test]
    fn test_http_prefix_without_scheme_is_rejected() {
        // Starts with "http" so no prefix is added, and "httpfoo" alone has no scheme
        assert!(normalize_url("httpfoo").is_none());
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(normalize_url("").is_none());
    }
}
