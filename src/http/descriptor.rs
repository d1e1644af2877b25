//! Descriptors exchanged with the engine.
//!
//! Both sides are JSON. Field names are fixed by the engine and must match
//! verbatim, hence the explicit renames.

use crate::base::neterror::NetError;
use crate::emulation::CustomTlsClient;
use crate::http::orderedheaders::OrderedHeaders;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status value the engine uses to report its own failure.
pub const ENGINE_FAILURE_STATUS: u16 = 0;

/// One request, as handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub session_id: String,
    pub follow_redirects: bool,
    pub force_http1: bool,
    pub headers: OrderedHeaders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_order: Option<Vec<String>>,
    pub insecure_skip_verify: bool,
    pub is_byte_request: bool,
    pub proxy_url: String,
    pub request_url: String,
    pub request_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    /// Cookies travel in the `Cookie` header; this list stays empty.
    #[serde(default)]
    pub request_cookies: Vec<String>,
    pub timeout_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_identifier: Option<String>,
    #[serde(
        rename = "withRandomTLSExtensionOrder",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub with_random_tls_extension_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tls_client: Option<CustomTlsClient>,
}

impl RequestDescriptor {
    /// Serialize for the engine.
    pub fn to_json(&self) -> Result<String, NetError> {
        serde_json::to_string(self)
            .map_err(|e| NetError::InvalidRequest(format!("descriptor serialization: {e}")))
    }
}

/// The engine's reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    /// HTTP status, or [`ENGINE_FAILURE_STATUS`].
    pub status: u16,
    /// Final URL after any redirects.
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: MultiHeaders,
    /// Text body, or base64 when `body_len` is present.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    /// Original byte length of a base64-encoded binary body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_len: Option<u64>,
}

impl ResponseDescriptor {
    pub fn is_engine_failure(&self) -> bool {
        self.status == ENGINE_FAILURE_STATUS
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Multi-valued response headers in the order the engine sent them.
///
/// Values arrive as string arrays; a bare string is accepted as a
/// single-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiHeaders {
    entries: Vec<(String, Vec<String>)>,
}

impl MultiHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((name, vec![value.into()])),
        }
    }

    /// Every value of every entry whose name matches case-insensitively.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(n, values)| (n.as_str(), values.as_slice()))
    }

    /// Collapse each entry to one string, values joined with `", "`.
    /// Names differing only in case share the first spelling seen.
    pub fn normalize(&self) -> OrderedHeaders {
        let mut headers = OrderedHeaders::new();
        for (name, values) in &self.entries {
            headers.append(name.clone(), values.join(", "));
        }
        headers
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MultiHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = MultiHeaders::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

impl Serialize for MultiHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<String>),
    One(String),
}

impl<'de> Deserialize<'de> for MultiHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MultiVisitor;

        impl<'de> Visitor<'de> for MultiVisitor {
            type Value = MultiHeaders;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((name, values)) = access.next_entry::<String, OneOrMany>()? {
                    let values = match values {
                        OneOrMany::Many(v) => v,
                        OneOrMany::One(v) => vec![v],
                    };
                    entries.push((name, values));
                }
                Ok(MultiHeaders { entries })
            }
        }

        deserializer.deserialize_map(MultiVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_descriptor_minimal() {
        let d: ResponseDescriptor = serde_json::from_str(r#"{"status":200}"#).unwrap();
        assert_eq!(d.status, 200);
        assert!(d.body.is_empty());
        assert!(d.headers.is_empty());
        assert_eq!(d.body_len, None);
    }

    #[test]
    fn test_response_descriptor_nulls() {
        let d: ResponseDescriptor =
            serde_json::from_str(r#"{"status":204,"headers":null,"body":null,"target":null}"#)
                .unwrap();
        assert!(d.headers.is_empty());
        assert!(d.body.is_empty());
    }

    #[test]
    fn test_response_descriptor_requires_status() {
        assert!(serde_json::from_str::<ResponseDescriptor>(r#"{"body":"x"}"#).is_err());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let d: ResponseDescriptor =
            serde_json::from_str(r#"{"status":200,"usedProtocol":"HTTP/2.0","id":"x"}"#).unwrap();
        assert_eq!(d.status, 200);
    }

    #[test]
    fn test_multi_headers_normalize() {
        let d: ResponseDescriptor = serde_json::from_str(
            r#"{"status":200,"headers":{"X-Multi":["a=1","b=2"],"Server":"nginx"}}"#,
        )
        .unwrap();
        let normalized = d.headers.normalize();
        assert_eq!(normalized.get("x-multi"), Some("a=1, b=2"));
        assert_eq!(normalized.get("Server"), Some("nginx"));
    }

    #[test]
    fn test_normalize_keeps_case_variant_values() {
        let d: ResponseDescriptor =
            serde_json::from_str(r#"{"status":200,"headers":{"X-Tag":["a"],"x-tag":["b"]}}"#)
                .unwrap();
        let normalized = d.headers.normalize();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.get("X-TAG"), Some("a, b"));
    }

    #[test]
    fn test_get_all_case_insensitive() {
        let headers: MultiHeaders = [("Set-Cookie", "a=1"), ("set-cookie", "b=2")]
            .into_iter()
            .collect();
        assert_eq!(headers.get_all("SET-COOKIE"), vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_request_descriptor_field_names() {
        let descriptor = RequestDescriptor {
            session_id: "s".into(),
            follow_redirects: false,
            force_http1: false,
            headers: OrderedHeaders::new(),
            header_order: None,
            insecure_skip_verify: false,
            is_byte_request: true,
            proxy_url: String::new(),
            request_url: "https://example.com/".into(),
            request_method: "GET".into(),
            request_body: None,
            request_cookies: Vec::new(),
            timeout_seconds: 30,
            tls_client_identifier: Some("chrome_108".into()),
            with_random_tls_extension_order: Some(false),
            custom_tls_client: None,
        };
        let value: serde_json::Value = serde_json::from_str(&descriptor.to_json().unwrap()).unwrap();
        for key in [
            "sessionId",
            "followRedirects",
            "forceHttp1",
            "headers",
            "insecureSkipVerify",
            "isByteRequest",
            "proxyUrl",
            "requestUrl",
            "requestMethod",
            "requestCookies",
            "timeoutSeconds",
            "tlsClientIdentifier",
            "withRandomTLSExtensionOrder",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("requestBody").is_none());
        assert!(value.get("customTlsClient").is_none());
    }
}
