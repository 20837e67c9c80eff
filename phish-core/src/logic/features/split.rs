//! Lenient URL splitting
//!
//! Splits a URL into scheme / netloc / path / params / query / fragment
//! without normalizing anything. Malformed URLs still split; the only
//! rejection is a host with broken IPv6 brackets.

use std::net::Ipv6Addr;

/// Schemes that carry `;params` on the last path segment
const PARAM_SCHEMES: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip",
    "sips", "mms", "sftp", "tel",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSplitError(pub String);

impl std::fmt::Display for UrlSplitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UrlSplitError: {}", self.0)
    }
}

impl std::error::Error for UrlSplitError {}

/// The six components of a URL, all possibly empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Lower-cased scheme
    pub scheme: String,
    pub netloc: String,
    pub path: String,
    pub params: String,
    pub query: String,
    pub fragment: String,
}

impl ParsedUrl {
    pub fn parse(raw: &str) -> Result<Self, UrlSplitError> {
        let cleaned: String = raw
            .trim_start_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();
        let mut rest = cleaned.as_str();
        let mut parsed = ParsedUrl::default();

        if let Some(colon) = rest.find(':') {
            let candidate = &rest[..colon];
            if is_scheme(candidate) {
                parsed.scheme = candidate.to_ascii_lowercase();
                rest = &rest[colon + 1..];
            }
        }

        if let Some(after) = rest.strip_prefix("//") {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            let netloc = &after[..end];
            check_netloc(netloc)?;
            parsed.netloc = netloc.to_string();
            rest = &after[end..];
        }

        if let Some((before, fragment)) = rest.split_once('#') {
            parsed.fragment = fragment.to_string();
            rest = before;
        }

        if let Some((before, query)) = rest.split_once('?') {
            parsed.query = query.to_string();
            rest = before;
        }

        if PARAM_SCHEMES.contains(&parsed.scheme.as_str()) && rest.contains(';') {
            let (path, params) = split_params(rest);
            parsed.path = path.to_string();
            parsed.params = params.to_string();
        } else {
            parsed.path = rest.to_string();
        }

        Ok(parsed)
    }

    /// Host without a trailing `:port`
    pub fn host(&self) -> &str {
        self.netloc.split(':').next().unwrap_or("")
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// `;params` belong to the last path segment only
fn split_params(path: &str) -> (&str, &str) {
    let semicolon = match path.rfind('/') {
        Some(slash) => path[slash..].find(';').map(|i| slash + i),
        None => path.find(';'),
    };
    match semicolon {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => (path, ""),
    }
}

fn check_netloc(netloc: &str) -> Result<(), UrlSplitError> {
    let open = netloc.contains('[');
    let close = netloc.contains(']');
    if open != close {
        return Err(UrlSplitError("Invalid IPv6 URL".to_string()));
    }
    if !open {
        return Ok(());
    }

    let host_port = netloc.rsplit('@').next().unwrap_or(netloc);
    let (before, bracketed) = host_port
        .split_once('[')
        .ok_or_else(|| UrlSplitError("Invalid IPv6 URL".to_string()))?;
    if !before.is_empty() {
        return Err(UrlSplitError("Invalid IPv6 URL".to_string()));
    }
    let (host, port) = bracketed.split_once(']').unwrap_or((bracketed, ""));
    if !port.is_empty() && !port.starts_with(':') {
        return Err(UrlSplitError("Invalid IPv6 URL".to_string()));
    }
    let ip_future = host.starts_with(['v', 'V']);
    if !ip_future && host.parse::<Ipv6Addr>().is_err() {
        return Err(UrlSplitError(format!("Invalid IPv6 host: {}", host)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_split() {
        let p = ParsedUrl::parse("HTTPS://user@Example.com:8443/a/b;v=1?x=1&y=2#top").unwrap();
        assert_eq!(p.scheme, "https");
        assert_eq!(p.netloc, "user@Example.com:8443");
        assert_eq!(p.path, "/a/b");
        assert_eq!(p.params, "v=1");
        assert_eq!(p.query, "x=1&y=2");
        assert_eq!(p.fragment, "top");
    }

    #[test]
    fn test_no_scheme_is_all_path() {
        let p = ParsedUrl::parse("www.example.com/login.php").unwrap();
        assert_eq!(p.scheme, "");
        assert_eq!(p.netloc, "");
        assert_eq!(p.path, "www.example.com/login.php");
    }

    #[test]
    fn test_host_strips_port() {
        let p = ParsedUrl::parse("http://10.0.0.1:8080/").unwrap();
        assert_eq!(p.host(), "10.0.0.1");
    }

    #[test]
    fn test_params_only_on_last_segment() {
        let p = ParsedUrl::parse("http://h/a;x/b").unwrap();
        assert_eq!(p.path, "/a;x/b");
        assert_eq!(p.params, "");
    }

    #[test]
    fn test_ipv6() {
        let p = ParsedUrl::parse("http://[::1]:80/x").unwrap();
        assert_eq!(p.netloc, "[::1]:80");
        assert!(ParsedUrl::parse("http://[::1/x").is_err());
        assert!(ParsedUrl::parse("http://host]/x").is_err());
        assert!(ParsedUrl::parse("http://[nothost]/").is_err());
    }
}
