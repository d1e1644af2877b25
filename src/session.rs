//! Sessions: identity, default headers, proxy, cookies and a fingerprint
//! profile shared by every request issued through them.
//!
//! # Example
//!
//! ```rust,ignore
//! use tlsbridge::emulation::profiles::Chrome;
//! use tlsbridge::Session;
//!
//! let session = Session::builder(engine)
//!     .emulation(Chrome::V120)
//!     .build()?;
//!
//! let resp = session
//!     .get("https://example.com")
//!     .param("q", "rust")
//!     .send()
//!     .await?;
//! ```

use crate::base::neterror::NetError;
use crate::bridge::{Engine, EngineBridge};
use crate::config::SessionConfig;
use crate::cookies::monster::CookieMonster;
use crate::emulation::{EmulationFactory, FingerprintProfile};
use crate::http::orderedheaders::OrderedHeaders;
use crate::http::response::Response;
use crate::urlrequest::builder::{build_descriptor, PreparedRequest, SessionContext};
use crate::urlrequest::options::RequestOptions;
use http::Method;
use serde::Serialize;
use url::Url;

/// Headers every new session starts with.
pub fn default_headers() -> OrderedHeaders {
    [
        (
            "User-Agent",
            concat!("tlsbridge/", env!("CARGO_PKG_VERSION")),
        ),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Accept", "*/*"),
        ("Connection", "keep-alive"),
    ]
    .into_iter()
    .collect()
}

/// A request session.
///
/// Calls may overlap; they share the cookie store, whose individual reads
/// and writes are atomic but not ordered across calls.
#[derive(Debug)]
pub struct Session {
    id: String,
    headers: OrderedHeaders,
    proxy: String,
    cookies: CookieMonster,
    profile: FingerprintProfile,
    header_order: Option<Vec<String>>,
    force_http1: bool,
    ignore_response_cookies: bool,
    bridge: EngineBridge,
}

impl Session {
    /// Session with the default profile and headers.
    pub fn new<E: Engine + 'static>(engine: E) -> Self {
        Self::with_bridge(EngineBridge::new(engine))
    }

    pub fn builder<E: Engine + 'static>(engine: E) -> SessionBuilder {
        SessionBuilder::new(EngineBridge::new(engine))
    }

    pub fn from_config<E: Engine + 'static>(
        engine: E,
        config: &SessionConfig,
    ) -> Result<Self, NetError> {
        let mut builder = Self::builder(engine)
            .emulation(config.into_profile()?)
            .force_http1(config.force_http1)
            .ignore_response_cookies(config.ignore_response_cookies);
        if let Some(order) = &config.header_order {
            builder = builder.header_order(order.iter().cloned());
        }
        if let Some(headers) = &config.headers {
            builder = builder.headers(headers.clone());
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.clone());
        }
        builder.build()
    }

    fn with_bridge(bridge: EngineBridge) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            headers: default_headers(),
            proxy: String::new(),
            cookies: CookieMonster::new(),
            profile: FingerprintProfile::default(),
            header_order: None,
            force_http1: false,
            ignore_response_cookies: false,
            bridge,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn headers(&self) -> &OrderedHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut OrderedHeaders {
        &mut self.headers
    }

    /// Session proxy URL; empty means direct.
    pub fn proxy(&self) -> &str {
        &self.proxy
    }

    pub fn set_proxy(&mut self, proxy: impl Into<String>) {
        self.proxy = proxy.into();
    }

    /// The persistent cookie store.
    pub fn cookies(&self) -> &CookieMonster {
        &self.cookies
    }

    pub fn profile(&self) -> &FingerprintProfile {
        &self.profile
    }

    pub fn header_order(&self) -> Option<&[String]> {
        self.header_order.as_deref()
    }

    fn context(&self) -> SessionContext<'_> {
        SessionContext {
            session_id: &self.id,
            headers: &self.headers,
            proxy: &self.proxy,
            cookies: &self.cookies,
            profile: &self.profile,
            header_order: self.header_order.as_deref(),
            force_http1: self.force_http1,
        }
    }

    /// Build the descriptor a call would send, without sending it.
    ///
    /// Per-call cookies in `options` are still written to the store.
    pub fn prepare(
        &self,
        method: &str,
        url: &str,
        options: &RequestOptions,
    ) -> Result<PreparedRequest, NetError> {
        build_descriptor(method, url, options, &self.context())
    }

    /// Run one request. Every verb method ends up here.
    pub async fn execute(
        &self,
        method: &str,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Response, NetError> {
        let prepared = self.prepare(method, url, options)?;
        let reply = self.bridge.round_trip(&prepared.descriptor).await?;

        let cookie_url = Url::parse(&reply.target)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(prepared.url);

        let ingest = !self.ignore_response_cookies;
        let response = Response::assemble(reply, &cookie_url, ingest);
        if ingest {
            self.cookies.merge_from(response.cookies());
        }

        tracing::debug!(
            session_id = %self.id,
            method = %prepared.descriptor.request_method,
            url = %response.url(),
            status = response.status(),
            binary = response.is_binary_content(),
            "request complete"
        );
        Ok(response)
    }

    pub fn get<U: AsRef<str>>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::GET, url)
    }

    pub fn post<U: AsRef<str>>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::POST, url)
    }

    pub fn put<U: AsRef<str>>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::PUT, url)
    }

    pub fn patch<U: AsRef<str>>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::PATCH, url)
    }

    pub fn delete<U: AsRef<str>>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::DELETE, url)
    }

    pub fn head<U: AsRef<str>>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::HEAD, url)
    }

    pub fn options<U: AsRef<str>>(&self, url: U) -> RequestBuilder<'_> {
        self.request(Method::OPTIONS, url)
    }

    /// Start building a request with any method.
    pub fn request<U: AsRef<str>>(&self, method: Method, url: U) -> RequestBuilder<'_> {
        RequestBuilder {
            session: self,
            method: method.as_str().to_string(),
            url: url.as_ref().to_string(),
            options: RequestOptions::default(),
        }
    }
}

/// Builder for a [`Session`].
#[derive(Debug)]
#[must_use]
pub struct SessionBuilder {
    bridge: EngineBridge,
    profile: FingerprintProfile,
    headers: Option<OrderedHeaders>,
    extra_headers: OrderedHeaders,
    proxy: String,
    header_order: Option<Vec<String>>,
    force_http1: bool,
    ignore_response_cookies: bool,
    cookies: Option<CookieMonster>,
}

impl SessionBuilder {
    fn new(bridge: EngineBridge) -> Self {
        Self {
            bridge,
            profile: FingerprintProfile::default(),
            headers: None,
            extra_headers: OrderedHeaders::new(),
            proxy: String::new(),
            header_order: None,
            force_http1: false,
            ignore_response_cookies: false,
            cookies: None,
        }
    }

    /// Set the fingerprint profile (preset enum, identifier string,
    /// custom client or a ready [`FingerprintProfile`]).
    pub fn emulation<E: EmulationFactory>(mut self, emulation: E) -> Self {
        self.profile = emulation.emulation();
        self
    }

    /// Randomize TLS extension order. Ignored for custom profiles.
    pub fn random_extension_order(mut self, enabled: bool) -> Self {
        self.profile = self.profile.with_random_extension_order(enabled);
        self
    }

    /// Replace the default session headers.
    pub fn headers(mut self, headers: OrderedHeaders) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Add or override one session header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = proxy.into();
        self
    }

    /// Request header order sent with every descriptor. Defaults to the
    /// custom profile's header order, if any.
    pub fn header_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn force_http1(mut self, force: bool) -> Self {
        self.force_http1 = force;
        self
    }

    /// Leave `Set-Cookie` headers out of both the response jar and the store.
    pub fn ignore_response_cookies(mut self, ignore: bool) -> Self {
        self.ignore_response_cookies = ignore;
        self
    }

    /// Start from an existing cookie store; it stays shared with the caller.
    pub fn cookie_store(mut self, store: CookieMonster) -> Self {
        self.cookies = Some(store);
        self
    }

    pub fn build(self) -> Result<Session, NetError> {
        if let Some(client) = self.profile.custom_client() {
            client.validate()?;
        }
        if !self.proxy.is_empty() {
            Url::parse(&self.proxy).map_err(|e| NetError::invalid_url(&self.proxy, e))?;
        }

        let mut headers = self.headers.unwrap_or_else(default_headers);
        headers.merge(&self.extra_headers);
        headers.validate()?;

        let header_order = self.header_order.or_else(|| {
            self.profile
                .custom_client()
                .and_then(|c| c.header_order.clone())
        });

        let mut session = Session::with_bridge(self.bridge);
        session.headers = headers;
        session.proxy = self.proxy;
        session.profile = self.profile;
        session.header_order = header_order;
        session.force_http1 = self.force_http1;
        session.ignore_response_cookies = self.ignore_response_cookies;
        if let Some(cookies) = self.cookies {
            session.cookies = cookies;
        }
        Ok(session)
    }
}

/// Builder for a single request on a [`Session`].
#[derive(Debug)]
#[must_use]
pub struct RequestBuilder<'a> {
    session: &'a Session,
    method: String,
    url: String,
    options: RequestOptions,
}

impl<'a> RequestBuilder<'a> {
    /// Replace all options at once.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.header(name, value);
        self
    }

    pub fn headers(mut self, headers: &OrderedHeaders) -> Self {
        self.options = self.options.headers(headers);
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.options = self.options.json(body);
        self
    }

    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options = self.options.form(pairs);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.options = self.options.param(name, value);
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.cookie(name, value);
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.options = self.options.proxy(proxy);
        self
    }

    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.options = self.options.allow_redirects(allow);
        self
    }

    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.options = self.options.insecure_skip_verify(skip);
        self
    }

    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.options = self.options.timeout_seconds(seconds);
        self
    }

    pub fn binary(mut self, binary: bool) -> Self {
        self.options = self.options.binary(binary);
        self
    }

    /// Send the request.
    pub async fn send(self) -> Result<Response, NetError> {
        self.session
            .execute(&self.method, &self.url, &self.options)
            .await
    }
}

/// One-shot request on a fresh default session.
pub async fn request<E: Engine + 'static>(
    engine: E,
    method: &str,
    url: &str,
    options: &RequestOptions,
) -> Result<Response, NetError> {
    Session::new(engine).execute(method, url, options).await
}
