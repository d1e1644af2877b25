//! One request descriptor out, one response descriptor back.
//!
//! [`EngineBridge`] owns the mapping from the engine's signaling into
//! [`NetError`]: an engine error or blank reply is a transport failure, an
//! unparseable reply is a parse failure, and status `0` carries the engine's
//! own message.

pub mod engine;
pub mod native;

pub use engine::{BlockingEngine, CallbackEngine, Dispatching, Engine, EngineCallback};
pub use native::NativeEngine;

use crate::base::neterror::NetError;
use crate::http::descriptor::{RequestDescriptor, ResponseDescriptor};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct EngineBridge {
    engine: Arc<dyn Engine>,
}

impl EngineBridge {
    pub fn new<E: Engine + 'static>(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn from_arc(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Submit `request` and wait for the engine's reply.
    ///
    /// This is the only suspension point of a request.
    pub async fn round_trip(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseDescriptor, NetError> {
        let payload = request.to_json()?;
        tracing::debug!(
            session_id = %request.session_id,
            method = %request.request_method,
            url = %request.request_url,
            bytes = payload.len(),
            "dispatching request descriptor"
        );

        let reply = self.engine.dispatch(payload).await?;
        tracing::debug!(
            session_id = %request.session_id,
            bytes = reply.len(),
            "engine replied"
        );

        parse_reply(&reply)
    }
}

impl fmt::Debug for EngineBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBridge").finish_non_exhaustive()
    }
}

/// Decode a raw engine reply and surface the status-0 sentinel as an error.
pub fn parse_reply(reply: &str) -> Result<ResponseDescriptor, NetError> {
    if reply.trim().is_empty() {
        return Err(NetError::EmptyResponse);
    }

    let descriptor: ResponseDescriptor = serde_json::from_str(reply).map_err(|e| {
        let err = NetError::response_parse(e, reply);
        tracing::error!(error = %err, "unparseable engine reply");
        err
    })?;

    if descriptor.is_engine_failure() {
        return Err(NetError::EngineReported(descriptor.body));
    }

    Ok(descriptor)
}
