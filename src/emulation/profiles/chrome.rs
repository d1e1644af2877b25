//! Chrome presets.
//!
//! Each variant names a Chrome ClientHello + HTTP/2 fingerprint the engine
//! ships with; the bridge only forwards the identifier.

use crate::emulation::{EmulationFactory, FingerprintProfile};
use std::fmt;

/// Chrome browser versions for emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Chrome {
    V103,
    V104,
    V105,
    V106,
    V107,
    /// Chrome 108, the engine-wide default.
    #[default]
    V108,
    V109,
    V110,
    V111,
    V112,
    /// Chrome 116 with TLS PSK resumption.
    V116Psk,
    V117,
    V120,
    V124,
    V131,
}

impl Chrome {
    /// Engine preset identifier.
    pub fn identifier(self) -> &'static str {
        match self {
            Chrome::V103 => "chrome_103",
            Chrome::V104 => "chrome_104",
            Chrome::V105 => "chrome_105",
            Chrome::V106 => "chrome_106",
            Chrome::V107 => "chrome_107",
            Chrome::V108 => "chrome_108",
            Chrome::V109 => "chrome_109",
            Chrome::V110 => "chrome_110",
            Chrome::V111 => "chrome_111",
            Chrome::V112 => "chrome_112",
            Chrome::V116Psk => "chrome_116_PSK",
            Chrome::V117 => "chrome_117",
            Chrome::V120 => "chrome_120",
            Chrome::V124 => "chrome_124",
            Chrome::V131 => "chrome_131",
        }
    }
}

impl fmt::Display for Chrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl EmulationFactory for Chrome {
    fn emulation(self) -> FingerprintProfile {
        FingerprintProfile::named(self.identifier())
    }
}
