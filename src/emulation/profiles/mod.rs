//! Preset profiles known to the engine.
//!
//! Contains typed identifiers for Chrome, Firefox, Safari, and OkHttp.

pub mod chrome;
pub mod firefox;
pub mod okhttp;
pub mod safari;

pub use chrome::Chrome;
pub use firefox::Firefox;
pub use okhttp::OkHttp;
pub use safari::Safari;
