//! Public Suffix List checks for `Domain=` cookie attributes.
//!
//! A response may not plant a cookie on `.com` or `.co.uk`; such lines are
//! dropped before they reach either the response jar or the session jar.

use psl::{List, Psl};

/// True when `domain` is itself a public suffix ("com", "co.uk", "github.io").
pub fn is_public_suffix(domain: &str) -> bool {
    let lower = domain.to_ascii_lowercase();
    List.suffix(lower.as_bytes())
        .is_some_and(|suffix| suffix.as_bytes() == lower.as_bytes())
}

/// Whether a response from `request_host` may set a cookie for `cookie_domain`.
pub fn is_valid_cookie_domain(cookie_domain: &str, request_host: &str) -> bool {
    let cookie_domain = cookie_domain
        .strip_prefix('.')
        .unwrap_or(cookie_domain)
        .to_ascii_lowercase();
    let request_host = request_host.to_ascii_lowercase();

    if cookie_domain.is_empty() {
        return false;
    }
    // An exact host match is allowed even for hosts that are suffixes themselves.
    if request_host == cookie_domain {
        return true;
    }
    if is_public_suffix(&cookie_domain) {
        return false;
    }
    request_host.ends_with(&format!(".{cookie_domain}"))
}
