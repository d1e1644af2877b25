//! Cookie storage.
//!
//! Each [`Session`](crate::session::Session) owns one persistent
//! [`CookieMonster`](monster::CookieMonster); each
//! [`Response`](crate::http::Response) carries a fresh one holding only the
//! cookies that response set.
//!
//! | Chromium (C++) | tlsbridge (Rust) | Responsibility |
//! |----------------|------------------|----------------|
//! | `net::CookieMonster` | [`CookieMonster`](monster::CookieMonster) | Cookie jar with eviction |
//! | `net::CanonicalCookie` | [`CanonicalCookie`](canonicalcookie::CanonicalCookie) | Single cookie + matching rules |
//!
//! ```rust
//! use tlsbridge::cookies::CookieMonster;
//! use url::Url;
//!
//! let jar = CookieMonster::new();
//! let url = Url::parse("https://example.com/").unwrap();
//! jar.parse_and_save_cookie(&url, "session=abc; Path=/");
//! assert_eq!(jar.cookie_header(&url), "session=abc");
//! ```

pub mod canonicalcookie;
pub mod monster;
pub mod psl;

pub use canonicalcookie::{CanonicalCookie, SameSite};
pub use monster::CookieMonster;
