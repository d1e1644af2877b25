//! Safari presets (desktop and iOS).

use crate::emulation::{EmulationFactory, FingerprintProfile};
use std::fmt;

/// Safari versions for emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Safari {
    V15_6_1,
    #[default]
    V16_0,
    /// Mobile Safari, iOS 15.5
    Ios15_5,
    /// Mobile Safari, iOS 15.6
    Ios15_6,
    /// Mobile Safari, iOS 16.0
    Ios16_0,
    /// Mobile Safari on iPadOS 15.6
    IpadOs15_6,
}

impl Safari {
    pub fn identifier(self) -> &'static str {
        match self {
            Safari::V15_6_1 => "safari_15_6_1",
            Safari::V16_0 => "safari_16_0",
            Safari::Ios15_5 => "safari_ios_15_5",
            Safari::Ios15_6 => "safari_ios_15_6",
            Safari::Ios16_0 => "safari_ios_16_0",
            Safari::IpadOs15_6 => "safari_ipad_15_6",
        }
    }

    pub fn is_mobile(self) -> bool {
        !matches!(self, Safari::V15_6_1 | Safari::V16_0)
    }
}

impl fmt::Display for Safari {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl EmulationFactory for Safari {
    fn emulation(self) -> FingerprintProfile {
        FingerprintProfile::named(self.identifier())
    }
}
