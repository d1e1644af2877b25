//! Structured response built from the engine's reply.

use crate::base::neterror::NetError;
use crate::cookies::monster::CookieMonster;
use crate::http::binary::{self, ContentAnomaly};
use crate::http::descriptor::ResponseDescriptor;
use crate::http::orderedheaders::OrderedHeaders;
use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

/// The result of one request.
///
/// Immutable once assembled. Owns its content and a cookie jar holding only
/// the cookies this response set.
#[derive(Debug, Clone)]
pub struct Response {
    url: String,
    status: u16,
    headers: OrderedHeaders,
    cookies: CookieMonster,
    content: Bytes,
    text: String,
    json: Option<serde_json::Value>,
    is_binary: bool,
    anomalies: Vec<ContentAnomaly>,
}

impl Response {
    /// Assemble from a non-sentinel descriptor.
    ///
    /// `cookie_url` scopes the `Set-Cookie` entries; with `ingest_cookies`
    /// off the jar stays empty.
    pub fn assemble(descriptor: ResponseDescriptor, cookie_url: &Url, ingest_cookies: bool) -> Self {
        let headers = descriptor.headers.normalize();

        let cookies = CookieMonster::new();
        if ingest_cookies {
            for line in descriptor.headers.get_all("set-cookie") {
                cookies.parse_and_save_cookie(cookie_url, line);
            }
        }

        let content_type = headers.get("content-type").unwrap_or_default().to_string();
        let decoded = binary::decode_body(&descriptor.body, descriptor.body_len, &content_type);

        let json = if !decoded.is_binary && content_type.contains("application/json") {
            serde_json::from_str(&decoded.text).ok()
        } else {
            None
        };

        Self {
            url: descriptor.target,
            status: descriptor.status,
            headers,
            cookies,
            content: decoded.content,
            text: decoded.text,
            json,
            is_binary: decoded.is_binary,
            anomalies: decoded.anomalies,
        }
    }

    /// Final URL after redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Standard reason phrase, `None` for unrecognized codes.
    pub fn reason(&self) -> Option<&'static str> {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
    }

    pub fn headers(&self) -> &OrderedHeaders {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Cookies set by this response only.
    pub fn cookies(&self) -> &CookieMonster {
        &self.cookies
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }

    /// Text view of the body. Empty for base64-decoded binary content.
    pub fn text(&self) -> &str {
        if self.is_binary {
            tracing::warn!(
                url = %self.url,
                "text() called on binary content; use content() instead"
            );
        }
        &self.text
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        self.json.as_ref()
    }

    /// Deserialize the parsed JSON body into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.json
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn is_binary_content(&self) -> bool {
        self.is_binary
    }

    /// Non-fatal problems met while decoding the body.
    pub fn anomalies(&self) -> &[ContentAnomaly] {
        &self.anomalies
    }

    /// Fail with [`NetError::HttpStatus`] unless the status is 2xx.
    pub fn raise_for_status(&self) -> Result<&Self, NetError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(NetError::HttpStatus {
                status: self.status,
                reason: self.reason().map(str::to_string),
            })
        }
    }
}
