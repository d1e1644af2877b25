//! Custom TLS client description.
//!
//! Field names serialize verbatim to the engine's `customTlsClient` object.
//! Unset fields are omitted so the engine applies its own defaults.

use crate::base::neterror::NetError;
use crate::emulation::GREASE_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Priority parameters of an HTTP/2 PRIORITY frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityParam {
    pub stream_dep: u32,
    pub exclusive: bool,
    pub weight: u16,
}

/// A PRIORITY frame the engine sends right after the connection preface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityFrame {
    #[serde(rename = "streamID")]
    pub stream_id: u32,
    pub priority_param: PriorityParam,
}

/// Fully custom TLS + HTTP/2 fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTlsClient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ja3_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h2_settings: Option<BTreeMap<String, u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h2_settings_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_signature_algorithms: Option<Vec<String>>,
    /// May contain [`GREASE_PLACEHOLDER`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_versions: Option<Vec<String>>,
    /// May contain [`GREASE_PLACEHOLDER`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_share_curves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_compression_algo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo_header_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_flow: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_frames: Option<Vec<PriorityFrame>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_priority: Option<BTreeMap<String, u32>>,
}

impl CustomTlsClient {
    /// Create new builder.
    pub fn builder() -> CustomTlsClientBuilder {
        CustomTlsClientBuilder::default()
    }

    /// True when no field has been set at all.
    pub fn is_empty(&self) -> bool {
        *self == CustomTlsClient::default()
    }

    /// Check internal consistency before the client is handed to the engine.
    pub fn validate(&self) -> Result<(), NetError> {
        if let Some(ja3) = &self.ja3_string {
            validate_ja3(ja3)?;
        }

        match (&self.h2_settings, &self.h2_settings_order) {
            (None, Some(order)) if !order.is_empty() => {
                return Err(NetError::invalid_profile(
                    "h2SettingsOrder given without h2Settings",
                ));
            }
            (Some(settings), Some(order)) => {
                if let Some(missing) = order.iter().find(|name| !settings.contains_key(*name)) {
                    return Err(NetError::invalid_profile(format!(
                        "h2SettingsOrder names unknown setting {missing}"
                    )));
                }
            }
            _ => {}
        }

        for (field, list) in [
            ("supportedVersions", &self.supported_versions),
            ("keyShareCurves", &self.key_share_curves),
            ("supportedSignatureAlgorithms", &self.supported_signature_algorithms),
            ("pseudoHeaderOrder", &self.pseudo_header_order),
        ] {
            if list.iter().flatten().any(|entry| entry.trim().is_empty()) {
                return Err(NetError::invalid_profile(format!(
                    "{field} contains an empty entry"
                )));
            }
        }

        if let Some(pseudo) = &self.pseudo_header_order {
            if let Some(bad) = pseudo.iter().find(|h| !h.starts_with(':')) {
                return Err(NetError::invalid_profile(format!(
                    "pseudoHeaderOrder entry {bad} is not a pseudo-header"
                )));
            }
        }

        Ok(())
    }

    /// Whether `supportedVersions` or `keyShareCurves` ask for a GREASE slot.
    pub fn uses_grease(&self) -> bool {
        self.supported_versions
            .iter()
            .chain(self.key_share_curves.iter())
            .flatten()
            .any(|v| v == GREASE_PLACEHOLDER)
    }
}

/// JA3: `version,ciphers,extensions,curves,point_formats`, each list dash-separated.
fn validate_ja3(ja3: &str) -> Result<(), NetError> {
    let fields: Vec<&str> = ja3.split(',').collect();
    if fields.len() != 5 {
        return Err(NetError::invalid_profile(format!(
            "JA3 string must have 5 comma-separated fields, found {}",
            fields.len()
        )));
    }
    if fields[0].is_empty() {
        return Err(NetError::invalid_profile("JA3 string has no TLS version"));
    }
    for field in &fields {
        if field.is_empty() {
            continue;
        }
        if field.split('-').any(|n| n.parse::<u16>().is_err()) {
            return Err(NetError::invalid_profile(format!(
                "JA3 field {field:?} is not a dash-separated list of numbers"
            )));
        }
    }
    Ok(())
}

/// Builder for [`CustomTlsClient`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct CustomTlsClientBuilder {
    config: CustomTlsClient,
}

impl CustomTlsClientBuilder {
    /// Set the JA3 string.
    pub fn ja3(mut self, ja3: impl Into<String>) -> Self {
        self.config.ja3_string = Some(ja3.into());
        self
    }

    /// Add an HTTP/2 SETTINGS entry; entries are ordered as added.
    pub fn h2_setting(mut self, name: impl Into<String>, value: u32) -> Self {
        let name = name.into();
        let order = self.config.h2_settings_order.get_or_insert_with(Vec::new);
        if !order.contains(&name) {
            order.push(name.clone());
        }
        self.config
            .h2_settings
            .get_or_insert_with(BTreeMap::new)
            .insert(name, value);
        self
    }

    /// Override the SETTINGS order.
    pub fn h2_settings_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.h2_settings_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn supported_signature_algorithms<I, S>(mut self, algos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supported_signature_algorithms =
            Some(algos.into_iter().map(Into::into).collect());
        self
    }

    pub fn supported_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supported_versions = Some(versions.into_iter().map(Into::into).collect());
        self
    }

    pub fn key_share_curves<I, S>(mut self, curves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.key_share_curves = Some(curves.into_iter().map(Into::into).collect());
        self
    }

    pub fn cert_compression_algo(mut self, algo: impl Into<String>) -> Self {
        self.config.cert_compression_algo = Some(algo.into());
        self
    }

    pub fn pseudo_header_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.pseudo_header_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    /// Connection-level WINDOW_UPDATE increment.
    pub fn connection_flow(mut self, increment: u32) -> Self {
        self.config.connection_flow = Some(increment);
        self
    }

    pub fn priority_frame(mut self, frame: PriorityFrame) -> Self {
        self.config
            .priority_frames
            .get_or_insert_with(Vec::new)
            .push(frame);
        self
    }

    pub fn header_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.header_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn header_priority(mut self, key: impl Into<String>, value: u32) -> Self {
        self.config
            .header_priority
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<CustomTlsClient, NetError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_JA3: &str = "771,4865-4866-4867-49195,0-23-65281-10-11,29-23-24,0";

    #[test]
    fn test_valid_ja3() {
        assert!(validate_ja3(CHROME_JA3).is_ok());
        assert!(validate_ja3("771,4865,,29,").is_ok());
    }

    #[test]
    fn test_invalid_ja3() {
        assert!(validate_ja3("771,4865").is_err());
        assert!(validate_ja3(",4865,0,29,0").is_err());
        assert!(validate_ja3("771,abc,0,29,0").is_err());
    }

    #[test]
    fn test_h2_setting_preserves_insertion_order() {
        let client = CustomTlsClient::builder()
            .h2_setting("MAX_HEADER_LIST_SIZE", 262144)
            .h2_setting("HEADER_TABLE_SIZE", 65536)
            .build()
            .unwrap();
        assert_eq!(
            client.h2_settings_order.unwrap(),
            vec!["MAX_HEADER_LIST_SIZE", "HEADER_TABLE_SIZE"]
        );
    }

    #[test]
    fn test_order_must_name_known_settings() {
        let err = CustomTlsClient::builder()
            .h2_setting("HEADER_TABLE_SIZE", 65536)
            .h2_settings_order(["HEADER_TABLE_SIZE", "ENABLE_PUSH"])
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_grease_placeholder_accepted() {
        let client = CustomTlsClient::builder()
            .supported_versions([GREASE_PLACEHOLDER, "1.3", "1.2"])
            .key_share_curves([GREASE_PLACEHOLDER, "X25519"])
            .build()
            .unwrap();
        assert!(client.uses_grease());
    }

    #[test]
    fn test_pseudo_header_order_checked() {
        assert!(CustomTlsClient::builder()
            .pseudo_header_order([":method", "path"])
            .build()
            .is_err());
    }

    #[test]
    fn test_serializes_engine_field_names() {
        let client = CustomTlsClient::builder()
            .ja3(CHROME_JA3)
            .connection_flow(15663105)
            .priority_frame(PriorityFrame {
                stream_id: 3,
                priority_param: PriorityParam {
                    stream_dep: 0,
                    exclusive: false,
                    weight: 201,
                },
            })
            .build()
            .unwrap();
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["ja3String"], CHROME_JA3);
        assert_eq!(value["connectionFlow"], 15663105);
        assert_eq!(value["priorityFrames"][0]["streamID"], 3);
        assert_eq!(value["priorityFrames"][0]["priorityParam"]["weight"], 201);
        assert!(value.get("h2Settings").is_none());
    }
}
