//! C ABI engine: a library exporting `char *request(const char *payload)`.

use crate::base::neterror::NetError;
use crate::bridge::engine::{Dispatching, Engine};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Signature of the engine's exported request function.
pub type RequestFn = unsafe extern "C" fn(payload: *const c_char) -> *mut c_char;

/// Signature of the matching deallocator for returned strings.
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_char);

/// Engine reached through raw C function pointers, typically resolved from a
/// dynamically loaded library by the caller.
///
/// Each call blocks one thread of tokio's blocking pool for its duration.
#[derive(Debug, Clone, Copy)]
pub struct NativeEngine {
    request: RequestFn,
    free: Option<FreeFn>,
}

impl NativeEngine {
    /// # Safety
    ///
    /// `request` must accept a NUL-terminated string and return either null
    /// or a NUL-terminated string that stays valid until passed to `free`
    /// (or forever, when `free` is `None`). Both functions must be callable
    /// from any thread.
    pub unsafe fn new(request: RequestFn, free: Option<FreeFn>) -> Self {
        Self { request, free }
    }

    fn call(self, payload: String) -> Result<String, NetError> {
        let input = CString::new(payload)
            .map_err(|e| NetError::engine_failed(format!("payload contains NUL: {e}")))?;

        // SAFETY: upheld by the contract of `NativeEngine::new`.
        unsafe {
            let out = (self.request)(input.as_ptr());
            if out.is_null() {
                return Ok(String::new());
            }
            let reply = CStr::from_ptr(out).to_string_lossy().into_owned();
            if let Some(free) = self.free {
                free(out);
            }
            Ok(reply)
        }
    }
}

impl Engine for NativeEngine {
    fn dispatch(&self, payload: String) -> Dispatching {
        let engine = *self;
        Box::pin(async move {
            tokio::task::spawn_blocking(move || engine.call(payload))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "native engine task failed");
                    NetError::engine_failed(e)
                })?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FREED: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn echo(payload: *const c_char) -> *mut c_char {
        let text = CStr::from_ptr(payload).to_string_lossy();
        match CString::new(format!("reply:{text}")) {
            Ok(s) => s.into_raw(),
            Err(_) => std::ptr::null_mut(),
        }
    }

    unsafe extern "C" fn release(ptr: *mut c_char) {
        drop(CString::from_raw(ptr));
        FREED.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn nothing(_: *const c_char) -> *mut c_char {
        std::ptr::null_mut()
    }

    #[tokio::test]
    async fn test_native_round_trip_frees_reply() {
        let engine = unsafe { NativeEngine::new(echo, Some(release)) };
        let before = FREED.load(Ordering::SeqCst);
        let reply = engine.dispatch("{}".into()).await.unwrap();
        assert_eq!(reply, "reply:{}");
        assert_eq!(FREED.load(Ordering::SeqCst), before + 1);
    }

    #[tokio::test]
    async fn test_null_reply_is_empty() {
        let engine = unsafe { NativeEngine::new(nothing, None) };
        assert_eq!(engine.dispatch("{}".into()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_interior_nul_rejected() {
        let engine = unsafe { NativeEngine::new(nothing, None) };
        let err = engine.dispatch("a\0b".into()).await.unwrap_err();
        assert!(matches!(err, NetError::EngineFailed(_)));
    }
}
