//! Per-call request options.

use crate::base::neterror::NetError;
use crate::http::orderedheaders::OrderedHeaders;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Options for a single call. Everything is optional; unset fields fall
/// back to session state or the defaults documented on each field.
///
/// Deserializes from the camelCase keys `headers`, `proxy`, `json`, `data`,
/// `params`, `cookies`, `allowRedirects`, `insecureSkipVerify`,
/// `timeoutSeconds` and `isBinaryRequest`. Scalar values in `data`,
/// `params` and `cookies` are stringified.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestOptions {
    /// Override same-named session headers.
    pub headers: OrderedHeaders,
    /// Overrides the session proxy; `Some("")` forces a direct connection.
    pub proxy: Option<String>,
    /// JSON body. Takes precedence over `data`.
    pub json: Option<serde_json::Value>,
    /// URL-encoded form body.
    #[serde(deserialize_with = "optional_scalar_pairs")]
    pub data: Option<Vec<(String, String)>>,
    /// Appended to the URL's query string.
    #[serde(deserialize_with = "scalar_pairs")]
    pub params: Vec<(String, String)>,
    /// Written into the session cookie store before sending.
    #[serde(deserialize_with = "scalar_pairs")]
    pub cookies: Vec<(String, String)>,
    /// Default `false`.
    pub allow_redirects: Option<bool>,
    /// Default `false`.
    pub insecure_skip_verify: Option<bool>,
    /// Default 30; `0` also means the default.
    pub timeout_seconds: Option<u64>,
    /// Auto-detected from the URL and `Accept` header when unset.
    pub is_binary_request: Option<bool>,
    #[serde(skip)]
    pub(crate) json_error: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: &OrderedHeaders) -> Self {
        self.headers.merge(headers);
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// A value that fails to serialize is reported when the request is built.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => {
                self.json = Some(value);
                self.json_error = None;
            }
            Err(e) => self.json_error = Some(e.to_string()),
        }
        self
    }

    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.data
            .get_or_insert_with(Vec::new)
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.allow_redirects = Some(allow);
        self
    }

    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = Some(skip);
        self
    }

    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Declare whether the reply carries binary content, bypassing detection.
    pub fn binary(mut self, binary: bool) -> Self {
        self.is_binary_request = Some(binary);
        self
    }

    /// Parse options from a JSON object.
    pub fn from_json(text: &str) -> Result<Self, NetError> {
        serde_json::from_str(text)
            .map_err(|e| NetError::InvalidRequest(format!("request options: {e}")))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Num(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Num(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

struct PairsVisitor;

impl<'de> Visitor<'de> for PairsVisitor {
    type Value = Vec<(String, String)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of names to strings, numbers or booleans")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, Scalar>()? {
            pairs.push((name, value.into_string()));
        }
        Ok(pairs)
    }
}

fn scalar_pairs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, String)>, D::Error> {
    deserializer.deserialize_map(PairsVisitor)
}

fn optional_scalar_pairs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<(String, String)>>, D::Error> {
    scalar_pairs(deserializer).map(Some)
}
