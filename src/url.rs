//! src/url.rs
//!
//! Purpose:
//!   Parse one candidate URL string into its scheme/host/port/path parts.
//!
//! Behavior:
//!   - Accept only the grammar `scheme "://" host [":" port] ["/" rest]`.
//!   - The scheme must be exactly `http`; anything else (including
//!     `https`) is rejected.
//!   - The port, when present, must be a decimal integer in [1, 65535].
//!   - A missing path defaults to `/`; a query string rides along inside
//!     the path untouched.
//!
//! Notes / assumptions:
//!   - No normalization of any kind: no case folding, no percent
//!     decoding, no IDN handling. The host is handed to DNS exactly as
//!     written, so `A.test` and `a.test` are distinct dedup keys.
//!   - The `url` crate is deliberately not used here: it normalizes its
//!     input, and the dedup gates key on the raw string.

/// One parsed candidate URL, owned by a single worker at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Always `http` for a successfully parsed URL.
    pub scheme: String,
    /// DNS name (or address literal) between `://` and the first `/` or `:`.
    pub host: String,
    /// Explicit port, or 80 when the URL does not carry one.
    pub port: u16,
    /// Request path starting at the first `/`, query included; `/` when absent.
    pub path: String,
}

/// Parse a URL string, returning `None` for anything outside the grammar.
///
/// Returns:
///   - `Some(ParsedUrl)` when the URL is a well-formed `http` URL.
///   - `None` for a malformed URL, a non-http scheme, or an out-of-range
///     port. The caller treats `None` as a silent discard.
pub fn parse(raw: &str) -> Option<ParsedUrl> {
    // Split off the scheme at the literal "://" separator.
    let (scheme, rest) = raw.split_once("://")?;

    // The scheme grammar is a letter followed by letters, digits, '+',
    // '.', or '-'. Check the shape first, then the value.
    let mut scheme_chars = scheme.chars();
    let first = scheme_chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')) {
        return None;
    }
    if scheme != "http" {
        return None;
    }

    // Everything up to the first '/' is the authority (host plus optional
    // port); everything from that '/' onward is the path. When there is
    // no '/', the whole remainder is the authority and the path defaults.
    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    // The host may not contain ':' — a colon starts the port, which must
    // then be non-empty, digits only, and inside [1, 65535].
    let (host, port) = match authority.split_once(':') {
        Some((host, port_str)) => {
            if port_str.is_empty() || !port_str.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // Digits-only, so parse failure can only mean overflow, which
            // is just as out of range as 65536.
            let port: u32 = port_str.parse().ok()?;
            if port == 0 || port > 65535 {
                return None;
            }
            (host, port as u16)
        }
        None => (authority, 80),
    };

    if host.is_empty() {
        return None;
    }

    let path = if path.is_empty() { "/" } else { path };

    Some(ParsedUrl {
        scheme: scheme.to_string(),
        host: host.to_string(),
        port,
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_url_defaults() {
        let parsed = parse("http://example.test").unwrap();
        assert_eq!(parsed.scheme, "http");
        assert_eq!(parsed.host, "example.test");
        assert_eq!(parsed.port, 80);
        assert_eq!(parsed.path, "/");
    }

    #[test]
    fn explicit_port_and_path() {
        let parsed = parse("http://example.test:8080/a/b?q=1&x=2").unwrap();
        assert_eq!(parsed.port, 8080);
        assert_eq!(parsed.path, "/a/b?q=1&x=2");
    }

    #[test]
    fn query_without_slash_stays_in_host() {
        // With no '/', there is nothing to start the path, so the '?' is
        // swallowed by the host token exactly like the original grammar.
        let parsed = parse("http://example.test?q=1").unwrap();
        assert_eq!(parsed.host, "example.test?q=1");
        assert_eq!(parsed.path, "/");
    }

    #[test]
    fn https_is_rejected() {
        assert!(parse("https://example.test/").is_none());
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(parse("ftp://example.test/").is_none());
        assert!(parse("file://example.test/").is_none());
    }

    #[test]
    fn scheme_shape_is_enforced() {
        assert!(parse("1http://example.test/").is_none());
        assert!(parse("ht~tp://example.test/").is_none());
        assert!(parse("://example.test/").is_none());
    }

    #[test]
    fn missing_host_is_rejected() {
        assert!(parse("http://").is_none());
        assert!(parse("http:///path").is_none());
    }

    #[test]
    fn port_boundaries() {
        assert!(parse("http://h:0/").is_none());
        assert!(parse("http://h:65536/").is_none());
        assert!(parse("http://h:70000/").is_none());
        assert_eq!(parse("http://h:1/").unwrap().port, 1);
        assert_eq!(parse("http://h:65535/").unwrap().port, 65535);
    }

    #[test]
    fn port_must_be_all_digits() {
        assert!(parse("http://h:80x/").is_none());
        assert!(parse("http://h:/").is_none());
        assert!(parse("http://h:-1/").is_none());
    }

    #[test]
    fn huge_port_is_rejected_not_wrapped() {
        assert!(parse("http://h:99999999999999999999/").is_none());
    }

    #[test]
    fn leading_zeros_are_decimal() {
        assert_eq!(parse("http://h:000080/").unwrap().port, 80);
    }

    #[test]
    fn empty_and_garbage_input() {
        assert!(parse("").is_none());
        assert!(parse("not a url").is_none());
        assert!(parse("http:/example.test/").is_none());
    }

    #[test]
    fn host_case_is_preserved() {
        assert_eq!(parse("http://ExAmPlE.test/").unwrap().host, "ExAmPlE.test");
    }
}
