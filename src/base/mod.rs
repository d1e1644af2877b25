//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): every failure a bridge call can surface
//! - [`ErrorKind`](neterror::ErrorKind): validation / transport / engine / parse / status

pub mod neterror;

pub use neterror::{ErrorKind, NetError};

#[cfg(test)]
mod tests;
