//! Fingerprint emulation parameters.
//!
//! The bridge never shapes a ClientHello itself; it carries one of two
//! descriptions to the engine:
//! - a preset identifier ([`profiles`]) the engine resolves internally
//! - a [`CustomTlsClient`]: JA3 string, HTTP/2 SETTINGS and their order,
//!   signature algorithms, TLS versions, key shares, pseudo-header order,
//!   PRIORITY frames, and header ordering
//!
//! ```rust
//! use tlsbridge::emulation::profiles::Chrome;
//! use tlsbridge::emulation::EmulationFactory;
//!
//! let profile = Chrome::V120.emulation();
//! assert_eq!(profile.identifier(), Some("chrome_120"));
//! ```

pub mod custom;
mod factory;
pub mod profiles;

pub use custom::{CustomTlsClient, CustomTlsClientBuilder, PriorityFrame, PriorityParam};
pub use factory::{EmulationFactory, FingerprintProfile};

/// Preset used when a session is configured with neither an identifier nor a custom client.
pub const DEFAULT_CLIENT_IDENTIFIER: &str = "chrome_108";

/// Sentinel asking the engine to insert a randomized GREASE value at this position.
pub const GREASE_PLACEHOLDER: &str = "GREASE";

#[cfg(test)]
mod tests {
    use super::profiles::{Chrome, Firefox, OkHttp, Safari};
    use super::*;

    #[test]
    fn test_default_profile_is_named_default() {
        let profile = FingerprintProfile::default();
        assert_eq!(profile.identifier(), Some(DEFAULT_CLIENT_IDENTIFIER));
        assert!(!profile.is_custom());
    }

    #[test]
    fn test_default_chrome_matches_default_identifier() {
        assert_eq!(Chrome::default().identifier(), DEFAULT_CLIENT_IDENTIFIER);
    }

    #[test]
    fn test_preset_identifiers() {
        assert_eq!(Firefox::V117.emulation().identifier(), Some("firefox_117"));
        assert_eq!(Safari::Ios16_0.to_string(), "safari_ios_16_0");
        assert_eq!(OkHttp::Android13.identifier(), "okhttp4_android_13");
    }

    #[test]
    fn test_random_extension_order_only_for_named() {
        let named = Chrome::V120.emulation().with_random_extension_order(true);
        assert!(matches!(
            named,
            FingerprintProfile::Named {
                random_extension_order: true,
                ..
            }
        ));

        let custom = CustomTlsClient::default()
            .emulation()
            .with_random_extension_order(true);
        assert!(custom.custom_client().is_some());
    }

    #[test]
    fn test_custom_profile_validates() {
        let bad = CustomTlsClient {
            ja3_string: Some("nope".into()),
            ..Default::default()
        };
        assert!(FingerprintProfile::custom(bad).is_err());
    }
}
