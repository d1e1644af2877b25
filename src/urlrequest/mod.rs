//! Turning a call (method, URL, options) plus session state into a
//! [`RequestDescriptor`](crate::http::RequestDescriptor).

pub mod builder;
pub mod detect;
pub mod options;

pub use builder::{build_descriptor, PreparedRequest, SessionContext, DEFAULT_TIMEOUT_SECONDS};
pub use options::RequestOptions;
