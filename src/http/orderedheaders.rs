use crate::base::neterror::NetError;
use http::header::{HeaderName, HeaderValue};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A header list that keeps insertion order and the caller's spelling of
/// each name, while matching names case-insensitively.
///
/// The engine replays headers exactly as named here, so names are not
/// lowercased the way `http::HeaderMap` would.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedHeaders {
    headers: Vec<(String, String)>,
}

impl OrderedHeaders {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Insert or replace. A case-insensitive match is updated in place
    /// (position kept, spelling taken from `name`); otherwise appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(slot) => *slot = (name, value),
            None => self.headers.push((name, value)),
        }
    }

    /// Add a value without dropping an existing one. A case-insensitive
    /// match keeps its spelling and gets `value` joined on with `", "`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => self.headers.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self
            .headers
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.headers.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Apply every entry of `other` on top of this list.
    pub fn merge(&mut self, other: &OrderedHeaders) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Reject names or values that could not go on the wire.
    pub fn validate(&self) -> Result<(), NetError> {
        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| NetError::InvalidRequest(format!("invalid header name {name:?}")))?;
            HeaderValue::from_str(value).map_err(|_| {
                NetError::InvalidRequest(format!("invalid value for header {name}"))
            })?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = OrderedHeaders::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl Serialize for OrderedHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (name, value) in &self.headers {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OrderedHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedHeaders;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut headers = OrderedHeaders::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    headers.insert(name, value);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_get() {
        let mut headers = OrderedHeaders::new();
        headers.insert("ACCEPT", "text/html");
        assert_eq!(headers.get("accept"), Some("text/html"));
        assert_eq!(headers.get("Accept"), Some("text/html"));
    }

    #[test]
    fn test_replace_keeps_position_takes_new_spelling() {
        let mut headers: OrderedHeaders =
            [("user-agent", "a"), ("Accept", "*/*")].into_iter().collect();
        headers.insert("User-Agent", "b");
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("User-Agent", "b"), ("Accept", "*/*")]);
    }

    #[test]
    fn test_append_joins_case_variants() {
        let mut headers = OrderedHeaders::new();
        headers.append("X-Tag", "a");
        headers.append("x-tag", "b");
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("X-Tag", "a, b")]);
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let headers: OrderedHeaders = [("Zeta", "1"), ("Alpha", "2")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&headers).unwrap(),
            r#"{"Zeta":"1","Alpha":"2"}"#
        );
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let headers: OrderedHeaders = serde_json::from_str(r#"{"b":"1","a":"2"}"#).unwrap();
        assert_eq!(headers.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_validate_rejects_bad_name() {
        let headers: OrderedHeaders = [("Bad Name", "x")].into_iter().collect();
        assert!(headers.validate().is_err());
    }

    #[test]
    fn test_remove() {
        let mut headers: OrderedHeaders = [("Cookie", "a=1")].into_iter().collect();
        assert_eq!(headers.remove("cookie").as_deref(), Some("a=1"));
        assert!(headers.is_empty());
    }
}
