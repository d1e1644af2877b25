//! Session configuration as a plain data object.
//!
//! Mirrors the engine-facing option names so a session can be configured
//! from JSON. Use [`Session::from_config`](crate::Session::from_config) to
//! turn one into a session.

use crate::base::neterror::NetError;
use crate::emulation::{CustomTlsClient, FingerprintProfile, PriorityFrame};
use crate::http::orderedheaders::OrderedHeaders;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Session configuration.
///
/// `client_identifier` selects a preset; the TLS fields describe a custom
/// client. Setting both is an error. Setting neither selects
/// [`DEFAULT_CLIENT_IDENTIFIER`](crate::emulation::DEFAULT_CLIENT_IDENTIFIER).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub client_identifier: Option<String>,
    #[serde(rename = "ja3string")]
    pub ja3_string: Option<String>,
    pub h2_settings: Option<BTreeMap<String, u32>>,
    pub h2_settings_order: Option<Vec<String>>,
    pub supported_signature_algorithms: Option<Vec<String>>,
    pub supported_versions: Option<Vec<String>>,
    pub key_share_curves: Option<Vec<String>>,
    pub cert_compression_algo: Option<String>,
    pub pseudo_header_order: Option<Vec<String>>,
    pub connection_flow: Option<u32>,
    pub priority_frames: Option<Vec<PriorityFrame>>,
    /// Request header order. Allowed with either kind of profile.
    pub header_order: Option<Vec<String>>,
    pub header_priority: Option<BTreeMap<String, u32>>,
    /// Only applies to preset identifiers.
    pub random_tls_extension_order: bool,
    pub force_http1: bool,
    pub ignore_response_cookies: bool,
    /// Replaces the default session headers when set.
    pub headers: Option<OrderedHeaders>,
    pub proxy: Option<String>,
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self, NetError> {
        serde_json::from_str(text)
            .map_err(|e| NetError::InvalidRequest(format!("session config: {e}")))
    }

    /// The custom TLS fields as a client description.
    pub fn custom_tls_client(&self) -> CustomTlsClient {
        CustomTlsClient {
            ja3_string: self.ja3_string.clone(),
            h2_settings: self.h2_settings.clone(),
            h2_settings_order: self.h2_settings_order.clone(),
            supported_signature_algorithms: self.supported_signature_algorithms.clone(),
            supported_versions: self.supported_versions.clone(),
            key_share_curves: self.key_share_curves.clone(),
            cert_compression_algo: self.cert_compression_algo.clone(),
            pseudo_header_order: self.pseudo_header_order.clone(),
            connection_flow: self.connection_flow,
            priority_frames: self.priority_frames.clone(),
            header_order: self.header_order.clone(),
            header_priority: self.header_priority.clone(),
        }
    }

    fn has_custom_tls_fields(&self) -> bool {
        let client = CustomTlsClient {
            header_order: None,
            ..self.custom_tls_client()
        };
        !client.is_empty()
    }

    /// Resolve the fingerprint profile, enforcing preset XOR custom.
    pub fn into_profile(&self) -> Result<FingerprintProfile, NetError> {
        let identifier = self
            .client_identifier
            .as_deref()
            .filter(|id| !id.trim().is_empty());

        match (identifier, self.has_custom_tls_fields()) {
            (Some(_), true) => Err(NetError::invalid_profile(
                "clientIdentifier cannot be combined with custom TLS fields",
            )),
            (Some(id), false) => Ok(FingerprintProfile::named(id)
                .with_random_extension_order(self.random_tls_extension_order)),
            (None, true) => FingerprintProfile::custom(self.custom_tls_client()),
            (None, false) => Ok(FingerprintProfile::default()
                .with_random_extension_order(self.random_tls_extension_order)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulation::DEFAULT_CLIENT_IDENTIFIER;

    #[test]
    fn test_empty_config_uses_default_preset() {
        let profile = SessionConfig::default().into_profile().unwrap();
        assert_eq!(profile.identifier(), Some(DEFAULT_CLIENT_IDENTIFIER));
    }

    #[test]
    fn test_named_with_random_order() {
        let config = SessionConfig::from_json(
            r#"{"clientIdentifier":"firefox_117","randomTlsExtensionOrder":true,"forceHttp1":true}"#,
        )
        .unwrap();
        assert!(config.force_http1);
        assert_eq!(
            config.into_profile().unwrap(),
            FingerprintProfile::Named {
                identifier: "firefox_117".into(),
                random_extension_order: true,
            }
        );
    }

    #[test]
    fn test_custom_fields() {
        let config = SessionConfig::from_json(
            r#"{
                "ja3string": "771,4865-4866,0-23-65281,29-23,0",
                "h2Settings": {"HEADER_TABLE_SIZE": 65536, "INITIAL_WINDOW_SIZE": 6291456},
                "h2SettingsOrder": ["HEADER_TABLE_SIZE", "INITIAL_WINDOW_SIZE"],
                "supportedVersions": ["GREASE", "1.3", "1.2"],
                "keyShareCurves": ["GREASE", "X25519"],
                "pseudoHeaderOrder": [":method", ":authority", ":scheme", ":path"],
                "connectionFlow": 15663105,
                "priorityFrames": [{"streamID": 3, "priorityParam": {"streamDep": 0, "exclusive": false, "weight": 200}}],
                "headerOrder": ["accept", "user-agent"]
            }"#,
        )
        .unwrap();
        let profile = config.into_profile().unwrap();
        let client = profile.custom_client().unwrap();
        assert!(client.uses_grease());
        assert_eq!(client.connection_flow, Some(15663105));
        assert_eq!(client.priority_frames.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            client.header_order.as_deref(),
            Some(&["accept".to_string(), "user-agent".to_string()][..])
        );
    }

    #[test]
    fn test_named_and_custom_conflict() {
        let config = SessionConfig {
            client_identifier: Some("chrome_120".into()),
            ja3_string: Some("771,4865,0,29,0".into()),
            ..Default::default()
        };
        let err = config.into_profile().unwrap_err();
        assert!(matches!(err, NetError::InvalidProfile(_)));
    }

    #[test]
    fn test_header_order_allowed_with_preset() {
        let config = SessionConfig {
            client_identifier: Some("chrome_120".into()),
            header_order: Some(vec!["accept".into()]),
            ..Default::default()
        };
        assert_eq!(config.into_profile().unwrap().identifier(), Some("chrome_120"));
    }

    #[test]
    fn test_invalid_custom_rejected() {
        let config = SessionConfig {
            h2_settings_order: Some(vec!["MAX_FRAME_SIZE".into()]),
            ..Default::default()
        };
        assert!(config.into_profile().is_err());
    }

    #[test]
    fn test_headers_and_proxy() {
        let config = SessionConfig::from_json(
            r#"{"headers":{"User-Agent":"x"},"proxy":"http://p:1","ignoreResponseCookies":true}"#,
        )
        .unwrap();
        assert_eq!(config.headers.unwrap().get("user-agent"), Some("x"));
        assert_eq!(config.proxy.as_deref(), Some("http://p:1"));
        assert!(config.ignore_response_cookies);
    }
}
