//! Firefox presets.

use crate::emulation::{EmulationFactory, FingerprintProfile};
use std::fmt;

/// Firefox browser versions for emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Firefox {
    V102,
    V104,
    V105,
    V106,
    V108,
    V110,
    V117,
    #[default]
    V120,
}

impl Firefox {
    pub fn identifier(self) -> &'static str {
        match self {
            Firefox::V102 => "firefox_102",
            Firefox::V104 => "firefox_104",
            Firefox::V105 => "firefox_105",
            Firefox::V106 => "firefox_106",
            Firefox::V108 => "firefox_108",
            Firefox::V110 => "firefox_110",
            Firefox::V117 => "firefox_117",
            Firefox::V120 => "firefox_120",
        }
    }
}

impl fmt::Display for Firefox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl EmulationFactory for Firefox {
    fn emulation(self) -> FingerprintProfile {
        FingerprintProfile::named(self.identifier())
    }
}
