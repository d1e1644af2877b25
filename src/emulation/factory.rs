//! Fingerprint profile and the factory trait that produces it.

use crate::base::neterror::NetError;
use crate::emulation::custom::CustomTlsClient;
use crate::emulation::DEFAULT_CLIENT_IDENTIFIER;

/// Factory trait for producing a [`FingerprintProfile`].
///
/// Implemented by the preset enums in [`profiles`](crate::emulation::profiles),
/// by [`CustomTlsClient`], and by plain identifier strings.
pub trait EmulationFactory {
    /// Create a [`FingerprintProfile`] from this factory.
    fn emulation(self) -> FingerprintProfile;
}

/// The TLS/HTTP2 fingerprint a session presents through the engine.
///
/// Exactly one of the two cases is ever active; the session flattens it into
/// every request descriptor it builds.
#[derive(Debug, Clone, PartialEq)]
pub enum FingerprintProfile {
    /// A preset identifier known to the engine (e.g. `chrome_108`).
    Named {
        identifier: String,
        random_extension_order: bool,
    },
    /// A fully specified custom client.
    Custom(Box<CustomTlsClient>),
}

impl Default for FingerprintProfile {
    fn default() -> Self {
        FingerprintProfile::named(DEFAULT_CLIENT_IDENTIFIER)
    }
}

impl FingerprintProfile {
    pub fn named(identifier: impl Into<String>) -> Self {
        FingerprintProfile::Named {
            identifier: identifier.into(),
            random_extension_order: false,
        }
    }

    /// Validate and wrap a custom client.
    pub fn custom(client: CustomTlsClient) -> Result<Self, NetError> {
        client.validate()?;
        Ok(FingerprintProfile::Custom(Box::new(client)))
    }

    /// Toggle TLS extension order randomization. Only meaningful for named presets.
    #[must_use]
    pub fn with_random_extension_order(mut self, enabled: bool) -> Self {
        if let FingerprintProfile::Named {
            random_extension_order,
            ..
        } = &mut self
        {
            *random_extension_order = enabled;
        }
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            FingerprintProfile::Named { identifier, .. } => Some(identifier),
            FingerprintProfile::Custom(_) => None,
        }
    }

    pub fn custom_client(&self) -> Option<&CustomTlsClient> {
        match self {
            FingerprintProfile::Named { .. } => None,
            FingerprintProfile::Custom(client) => Some(client),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, FingerprintProfile::Custom(_))
    }
}

impl EmulationFactory for FingerprintProfile {
    #[inline]
    fn emulation(self) -> FingerprintProfile {
        self
    }
}

impl EmulationFactory for &str {
    #[inline]
    fn emulation(self) -> FingerprintProfile {
        FingerprintProfile::named(self)
    }
}

impl EmulationFactory for String {
    #[inline]
    fn emulation(self) -> FingerprintProfile {
        FingerprintProfile::named(self)
    }
}

/// Validation is deferred to session construction.
impl EmulationFactory for CustomTlsClient {
    #[inline]
    fn emulation(self) -> FingerprintProfile {
        FingerprintProfile::Custom(Box::new(self))
    }
}
