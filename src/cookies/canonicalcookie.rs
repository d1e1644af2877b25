use cookie::Cookie;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::{Host, Url};

/// A single stored cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

impl CanonicalCookie {
    /// Host-only session cookie scoped to `url`, as produced by a bare `name=value` pair.
    pub fn host_only(url: &Url, name: &str, value: &str) -> Option<Self> {
        let host = url.host_str()?.to_lowercase();
        Some(Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: host,
            path: default_path(url.path()),
            creation_time: OffsetDateTime::now_utc(),
            expiration_time: None,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: SameSite::Unspecified,
        })
    }

    /// Parse a `Set-Cookie` line received from `url`.
    ///
    /// Returns `None` when the line is unparseable or the cookie must be
    /// rejected (public-suffix domain, domain outside the request host,
    /// broken `__Secure-`/`__Host-` prefix).
    pub fn from_set_cookie(url: &Url, line: &str) -> Option<Self> {
        let parsed = Cookie::parse(line).ok()?;
        let request_host = url.host_str()?.to_lowercase();
        let now = OffsetDateTime::now_utc();

        let (domain, host_only) = match parsed.domain() {
            Some(d) if !d.is_empty() => {
                let d = d.trim_start_matches('.').to_lowercase();
                if is_ip_host(url) {
                    // IP literals only domain-match themselves (RFC 6265 5.1.3).
                    if d != request_host.trim_start_matches('[').trim_end_matches(']') {
                        return None;
                    }
                    (request_host, true)
                } else {
                    if !crate::cookies::psl::is_valid_cookie_domain(&d, &request_host) {
                        return None;
                    }
                    (d, false)
                }
            }
            _ => (request_host, true),
        };

        let path = match parsed.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => default_path(url.path()),
        };

        // Max-Age wins over Expires (RFC 6265 5.3 step 3).
        let expiration_time = match parsed.max_age() {
            Some(age) => Some(
                now.checked_add(age)
                    .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc()),
            ),
            None => parsed.expires().and_then(|e| e.datetime()),
        };

        let same_site = match parsed.same_site() {
            Some(cookie::SameSite::Lax) => SameSite::Lax,
            Some(cookie::SameSite::Strict) => SameSite::Strict,
            Some(cookie::SameSite::None) => SameSite::NoRestriction,
            None => SameSite::Unspecified,
        };

        let cookie = Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path,
            creation_time: now,
            expiration_time,
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
            same_site,
        };

        if !cookie.has_valid_prefix(url.scheme() == "https") {
            return None;
        }
        Some(cookie)
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expiration_time
            .is_some_and(|expiry| expiry <= current_time)
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    pub fn has_valid_prefix(&self, secure_origin: bool) -> bool {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return false;
        }
        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return false;
        }
        true
    }

    /// Whether this cookie should be sent with a request to `url`.
    pub fn matches_url(&self, url: &Url, now: OffsetDateTime) -> bool {
        let host = url.host_str().unwrap_or("");
        domain_matches(&self.domain, host, self.host_only || is_ip_host(url))
            && path_matches(&self.path, url.path())
            && (!self.secure || url.scheme() == "https")
            && !self.is_expired(now)
    }

    /// `name=value` as it appears in a `Cookie` request header.
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

pub(crate) fn is_ip_host(url: &Url) -> bool {
    matches!(url.host(), Some(Host::Ipv4(_) | Host::Ipv6(_)))
}

/// RFC 6265 5.1.4 default-path: the directory of the request path.
fn default_path(request_path: &str) -> String {
    if !request_path.starts_with('/') {
        return "/".to_string();
    }
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => request_path[..idx].to_string(),
    }
}

/// RFC 6265 5.1.3 domain matching.
fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
    if host_only {
        return cookie_domain.eq_ignore_ascii_case(request_host);
    }

    let cookie_domain = cookie_domain.trim_start_matches('.');
    if request_host.eq_ignore_ascii_case(cookie_domain) {
        return true;
    }

    request_host.len() > cookie_domain.len()
        && request_host
            .to_ascii_lowercase()
            .ends_with(&format!(".{}", cookie_domain.to_ascii_lowercase()))
}

/// RFC 6265 5.1.4 path matching.
fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    if let Some(rest) = request_path.strip_prefix(cookie_path) {
        return cookie_path.ends_with('/') || rest.starts_with('/');
    }
    false
}
