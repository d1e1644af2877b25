//! # tlsbridge
//!
//! A request/response bridge to an external TLS and HTTP/2 fingerprinting
//! engine.
//!
//! The engine does the networking (ClientHello shaping, HTTP/2 SETTINGS and
//! pseudo-header order, proxying). `tlsbridge` does everything around it:
//! it builds the engine's JSON request descriptor, keeps per-session cookies,
//! decodes the reply descriptor and recovers binary bodies that crossed the
//! text boundary.
//!
//! ## Features
//!
//! - **Sessions**: one identity, header set, proxy and cookie store per session
//! - **Fingerprint Profiles**: engine presets or fully custom JA3/HTTP2 parameters
//! - **Cookie Management**: RFC 6265 matching with PSL validation
//! - **Binary-Safe Bodies**: base64 recovery with non-fatal anomaly reporting
//! - **Pluggable Engines**: async, blocking, callback and C ABI adapters
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tlsbridge::bridge::NativeEngine;
//! use tlsbridge::Session;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tlsbridge::NetError> {
//!     let engine = unsafe { NativeEngine::new(engine_request, Some(engine_free)) };
//!     let session = Session::new(engine);
//!     let response = session.get("https://example.com").send().await?;
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`bridge`] - Engine trait, adapters and reply decoding
//! - [`cookies`] - Cookie storage and parsing
//! - [`emulation`] - Fingerprint profiles and presets
//! - [`http`] - Descriptors, headers, body codec and responses
//! - [`urlrequest`] - Per-call options and descriptor construction
//! - [`session`] - Sessions and request builders

pub mod base;
pub mod bridge;
pub mod config;
pub mod cookies;
pub mod emulation;
pub mod http;
pub mod session;
pub mod urlrequest;

pub use base::{ErrorKind, NetError};
pub use config::SessionConfig;
pub use emulation::{EmulationFactory, FingerprintProfile};
pub use http::{ContentAnomaly, OrderedHeaders, Response};
pub use session::{request, RequestBuilder, Session, SessionBuilder};
pub use urlrequest::{RequestOptions, DEFAULT_TIMEOUT_SECONDS};
