//! Destination URL normalisation
//!
//! Accepts what people paste into a form ("example.com/page") and turns it
//! into an absolute http(s) URL, or explains why it cannot.

use url::{Host, Url};

use crate::errors::{Result, ShortstatError};

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Trim, default the scheme to `http://`, parse and check the host.
///
/// Checks run in this order: empty input, URL syntax, host has a dot,
/// domain restriction, then scheme.
pub fn normalize_destination(raw: &str, restrict_domain: Option<&str>) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ShortstatError::empty_input("Please specify an URL"));
    }

    let candidate = if has_scheme(raw) {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ShortstatError::invalid_url(format!("Invalid URL '{}': {}", raw, e)))?;

    // 末尾的根点不影响域名判断
    let host = url.host_str().unwrap_or_default().trim_end_matches('.');
    if !host.contains('.') {
        return Err(ShortstatError::invalid_url(format!(
            "No valid domain in URL: {}",
            host
        )));
    }

    if let Some(domain) = restriction(restrict_domain)
        && !host_matches(host, &domain)
    {
        return Err(ShortstatError::domain_not_allowed(format!(
            "Only URLs on {} domain allowed",
            domain
        )));
    }

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(ShortstatError::invalid_url(format!(
            "Unsupported scheme '{}'. Only http:// and https:// are allowed",
            url.scheme()
        )));
    }

    Ok(url)
}

/// `scheme://` at the start, with an RFC 3986 scheme name
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// The restriction in the same ASCII (punycode) form `Url` gives hosts
fn restriction(restrict_domain: Option<&str>) -> Option<String> {
    let domain = restrict_domain?.trim().trim_matches('.');
    if domain.is_empty() {
        return None;
    }
    match Host::parse(domain) {
        Ok(host) => Some(host.to_string()),
        Err(_) => Some(domain.to_lowercase()),
    }
}

/// Exact match or a subdomain of `domain`
fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_lowercase();
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'))
}
