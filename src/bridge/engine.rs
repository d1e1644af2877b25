//! The engine abstraction and its adapters.
//!
//! An engine takes one serialized request descriptor and produces one
//! serialized response descriptor. Nothing streams.

use crate::base::neterror::NetError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Alias for the `Future` returned by an engine call.
pub type Dispatching = Pin<Box<dyn Future<Output = Result<String, NetError>> + Send>>;

/// An external fingerprinting engine.
///
/// Implementations must be thread-safe; a session shares one engine
/// across all of its calls.
///
/// Dropping the returned future abandons the wait for the reply. Whether the
/// engine stops working on the request is up to the engine; none of the
/// adapters here can cancel a call once it has been handed over.
pub trait Engine: Send + Sync {
    /// Submit one serialized request descriptor.
    fn dispatch(&self, payload: String) -> Dispatching;
}

/// Blanket implementation for Arc-wrapped engines.
impl<E: Engine + ?Sized> Engine for Arc<E> {
    fn dispatch(&self, payload: String) -> Dispatching {
        (**self).dispatch(payload)
    }
}

type BlockingFn = dyn Fn(String) -> Result<String, String> + Send + Sync;

/// Engine backed by a synchronous function, run on tokio's blocking pool.
#[derive(Clone)]
pub struct BlockingEngine {
    call: Arc<BlockingFn>,
}

impl BlockingEngine {
    pub fn new<F>(call: F) -> Self
    where
        F: Fn(String) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            call: Arc::new(call),
        }
    }
}

impl Engine for BlockingEngine {
    fn dispatch(&self, payload: String) -> Dispatching {
        let call = self.call.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || call(payload))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "engine task failed");
                    NetError::engine_failed(e)
                })?
                .map_err(NetError::EngineFailed)
        })
    }
}

impl fmt::Debug for BlockingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingEngine").finish_non_exhaustive()
    }
}

/// Completion handle given to a [`CallbackEngine`] function. Call it once
/// with either the reply payload or an error message.
pub type EngineCallback = Box<dyn FnOnce(Result<String, String>) + Send>;

type StartFn = dyn Fn(String, EngineCallback) + Send + Sync;

/// Engine for callback-style native calls: the function is started with the
/// payload and a completion callback, and may finish on any thread.
///
/// A callback dropped without being called surfaces as
/// [`NetError::EngineFailed`].
#[derive(Clone)]
pub struct CallbackEngine {
    start: Arc<StartFn>,
}

impl CallbackEngine {
    pub fn new<F>(start: F) -> Self
    where
        F: Fn(String, EngineCallback) + Send + Sync + 'static,
    {
        Self {
            start: Arc::new(start),
        }
    }
}

impl Engine for CallbackEngine {
    fn dispatch(&self, payload: String) -> Dispatching {
        let (tx, rx) = oneshot::channel();
        let callback: EngineCallback = Box::new(move |reply| {
            // Receiver gone means the caller stopped waiting.
            let _ = tx.send(reply);
        });
        (self.start)(payload, callback);

        Box::pin(async move {
            match rx.await {
                Ok(reply) => reply.map_err(NetError::EngineFailed),
                Err(_) => Err(NetError::engine_failed(
                    "engine dropped the callback without replying",
                )),
            }
        })
    }
}

impl fmt::Debug for CallbackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocking_engine_passes_payload() {
        let engine = BlockingEngine::new(|payload| Ok(format!("echo:{payload}")));
        let reply = engine.dispatch("x".into()).await.unwrap();
        assert_eq!(reply, "echo:x");
    }

    #[tokio::test]
    async fn test_blocking_engine_error_is_transport() {
        let engine = BlockingEngine::new(|_| Err("boom".into()));
        let err = engine.dispatch(String::new()).await.unwrap_err();
        assert_eq!(err, NetError::EngineFailed("boom".into()));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_callback_engine_from_other_thread() {
        let engine = CallbackEngine::new(|payload, done| {
            std::thread::spawn(move || done(Ok(payload.to_uppercase())));
        });
        assert_eq!(engine.dispatch("abc".into()).await.unwrap(), "ABC");
    }

    #[tokio::test]
    async fn test_callback_engine_dropped_callback() {
        let engine = CallbackEngine::new(|_, done| drop(done));
        let err = engine.dispatch(String::new()).await.unwrap_err();
        assert!(matches!(err, NetError::EngineFailed(_)));
    }

    #[tokio::test]
    async fn test_arc_engine() {
        let engine: Arc<dyn Engine> = Arc::new(BlockingEngine::new(|p| Ok(p)));
        assert_eq!(engine.dispatch("p".into()).await.unwrap(), "p");
    }
}
