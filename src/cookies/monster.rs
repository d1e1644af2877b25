use crate::cookies::canonicalcookie::{is_ip_host, CanonicalCookie};
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

/// Maximum cookies per domain (Chromium default).
const MAX_COOKIES_PER_DOMAIN: usize = 50;

/// Maximum total cookies held by one jar.
const MAX_COOKIES_TOTAL: usize = 3000;

/// In-memory RFC 6265 cookie jar.
/// Modeled after Chromium's `net::CookieMonster`.
///
/// Individual set/get operations are atomic per domain bucket. Callers that
/// issue overlapping requests on one jar get no ordering guarantee between
/// them beyond that.
#[derive(Clone)]
pub struct CookieMonster {
    // Map<Domain, List<Cookie>>
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CookieMonster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieMonster")
            .field("cookies", &self.total_cookie_count())
            .finish()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Insert a cookie, replacing any with the same name/domain/path.
    /// An already-expired cookie only deletes its predecessor.
    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) {
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();

        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);

        if cookie.is_expired(OffsetDateTime::now_utc()) {
            return;
        }

        // Per-domain limit, oldest first.
        while entry.len() >= MAX_COOKIES_PER_DOMAIN {
            match entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.creation_time)
                .map(|(i, _)| i)
            {
                Some(oldest_idx) => {
                    entry.remove(oldest_idx);
                }
                None => break,
            }
        }

        entry.push(cookie);
        drop(entry); // Release the bucket lock before walking the whole map

        self.enforce_global_limit();
    }

    fn enforce_global_limit(&self) {
        while self.total_cookie_count() > MAX_COOKIES_TOTAL {
            let mut oldest: Option<(String, usize, OffsetDateTime)> = None;

            for entry in self.store.iter() {
                for (idx, cookie) in entry.value().iter().enumerate() {
                    let older = oldest
                        .as_ref()
                        .map_or(true, |(_, _, t)| cookie.creation_time < *t);
                    if older {
                        oldest = Some((entry.key().clone(), idx, cookie.creation_time));
                    }
                }
            }

            let Some((domain, idx, _)) = oldest else {
                break;
            };
            if let Some(mut entry) = self.store.get_mut(&domain) {
                if idx < entry.len() {
                    entry.remove(idx);
                }
            }
        }
    }

    /// Cookies to send with a request to `url`, longest path first,
    /// then oldest first (RFC 6265 5.4 step 2).
    pub fn get_cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let host = url.host_str().unwrap_or("").to_lowercase();
        let now = OffsetDateTime::now_utc();

        let domains = if is_ip_host(url) {
            vec![host]
        } else {
            Self::get_matching_domains(&host)
        };

        let mut result: Vec<CanonicalCookie> = domains
            .into_iter()
            .filter_map(|domain| self.store.get(&domain))
            .flat_map(|entry| {
                entry
                    .iter()
                    .filter(|c| c.matches_url(url, now))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();

        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        result
    }

    /// Serialized `Cookie` header value for `url` (empty when nothing matches).
    pub fn cookie_header(&self, url: &Url) -> String {
        self.get_cookies_for_url(url)
            .iter()
            .map(CanonicalCookie::pair)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The host itself and all of its parent domains.
    fn get_matching_domains(host: &str) -> Vec<String> {
        let mut domains = vec![host.to_string()];
        let parts: Vec<&str> = host.split('.').collect();
        for i in 1..parts.len().saturating_sub(1) {
            domains.push(parts[i..].join("."));
        }
        domains
    }

    /// Parse a `Set-Cookie` line received from `url` and store it.
    /// Returns whether the cookie was accepted.
    pub fn parse_and_save_cookie(&self, url: &Url, cookie_line: &str) -> bool {
        match CanonicalCookie::from_set_cookie(url, cookie_line) {
            Some(cookie) => {
                self.set_canonical_cookie(cookie);
                true
            }
            None => {
                tracing::debug!(url = %url, line = cookie_line, "rejected Set-Cookie");
                false
            }
        }
    }

    /// Store a plain `name=value` cookie for `url`.
    pub fn set_cookie(&self, url: &Url, name: &str, value: &str) -> bool {
        match CanonicalCookie::host_only(url, name, value) {
            Some(cookie) => {
                self.set_canonical_cookie(cookie);
                true
            }
            None => false,
        }
    }

    /// Copy every cookie of `other` into this jar.
    pub fn merge_from(&self, other: &CookieMonster) {
        for cookie in other.iter_all_cookies() {
            self.set_canonical_cookie(cookie);
        }
    }

    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_cookie_count() == 0
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Snapshot of every stored cookie.
    pub fn iter_all_cookies(&self) -> impl Iterator<Item = CanonicalCookie> + '_ {
        self.store.iter().flat_map(|entry| entry.value().clone())
    }

    /// Look up a cookie value by name across all domains.
    pub fn get(&self, name: &str) -> Option<String> {
        self.iter_all_cookies()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_matching_domains() {
        assert_eq!(
            CookieMonster::get_matching_domains("a.b.example.com"),
            vec!["a.b.example.com", "b.example.com", "example.com"]
        );
    }

    #[test]
    fn test_replace_same_name_and_path() {
        let jar = CookieMonster::new();
        let u = url("https://example.com/");
        jar.parse_and_save_cookie(&u, "a=1");
        jar.parse_and_save_cookie(&u, "a=2");
        assert_eq!(jar.total_cookie_count(), 1);
        assert_eq!(jar.cookie_header(&u), "a=2");
    }

    #[test]
    fn test_expired_cookie_deletes() {
        let jar = CookieMonster::new();
        let u = url("https://example.com/");
        jar.parse_and_save_cookie(&u, "a=1");
        jar.parse_and_save_cookie(&u, "a=1; Max-Age=0");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_per_domain_limit() {
        let jar = CookieMonster::new();
        let u = url("https://example.com/");
        for i in 0..(MAX_COOKIES_PER_DOMAIN + 10) {
            jar.set_cookie(&u, &format!("c{i}"), "v");
        }
        assert_eq!(jar.total_cookie_count(), MAX_COOKIES_PER_DOMAIN);
    }

    #[test]
    fn test_cookie_header_orders_longest_path_first() {
        let jar = CookieMonster::new();
        let u = url("https://example.com/foo/bar");
        jar.parse_and_save_cookie(&u, "root=1; Path=/");
        jar.parse_and_save_cookie(&u, "deep=2; Path=/foo");
        assert_eq!(jar.cookie_header(&u), "deep=2; root=1");
    }

    #[test]
    fn test_ip_host_cookies_stay_on_that_address() {
        let jar = CookieMonster::new();
        let origin = url("http://10.0.0.1/");
        assert!(!jar.parse_and_save_cookie(&origin, "a=1; Domain=0.0.1"));
        jar.parse_and_save_cookie(&origin, "b=2");

        assert_eq!(jar.cookie_header(&origin), "b=2");
        assert_eq!(jar.cookie_header(&url("http://20.0.0.1/")), "");
    }

    #[test]
    fn test_merge_from() {
        let a = CookieMonster::new();
        let b = CookieMonster::new();
        let u = url("https://example.com/");
        b.set_cookie(&u, "x", "1");
        a.merge_from(&b);
        assert_eq!(a.get("x").as_deref(), Some("1"));
    }
}
