//! OkHttp presets.
//!
//! Android's OkHttp 4 stack, keyed by the Android release it ships with.

use crate::emulation::{EmulationFactory, FingerprintProfile};
use std::fmt;

/// OkHttp 4 on a given Android release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum OkHttp {
    Android7,
    Android8,
    Android9,
    Android10,
    Android11,
    Android12,
    #[default]
    Android13,
}

impl OkHttp {
    pub fn identifier(self) -> &'static str {
        match self {
            OkHttp::Android7 => "okhttp4_android_7",
            OkHttp::Android8 => "okhttp4_android_8",
            OkHttp::Android9 => "okhttp4_android_9",
            OkHttp::Android10 => "okhttp4_android_10",
            OkHttp::Android11 => "okhttp4_android_11",
            OkHttp::Android12 => "okhttp4_android_12",
            OkHttp::Android13 => "okhttp4_android_13",
        }
    }
}

impl fmt::Display for OkHttp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl EmulationFactory for OkHttp {
    fn emulation(self) -> FingerprintProfile {
        FingerprintProfile::named(self.identifier())
    }
}
