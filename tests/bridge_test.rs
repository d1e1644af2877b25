use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::Arc;
use tlsbridge::bridge::{BlockingEngine, CallbackEngine, Engine, NativeEngine};
use tlsbridge::{NetError, Session};

/// Echoes the request URL back as the target, like a real engine would
/// after a request without redirects.
fn answer(payload: &str) -> Result<String, String> {
    let request: serde_json::Value = serde_json::from_str(payload).map_err(|e| e.to_string())?;
    Ok(serde_json::json!({
        "status": 200,
        "target": request["requestUrl"],
        "headers": {"Content-Type": ["text/plain"]},
        "body": request["requestMethod"],
    })
    .to_string())
}

unsafe extern "C" fn native_request(payload: *const c_char) -> *mut c_char {
    let payload = CStr::from_ptr(payload).to_string_lossy();
    let reply = answer(&payload).unwrap_or_default();
    CString::new(reply).map_or(std::ptr::null_mut(), CString::into_raw)
}

unsafe extern "C" fn native_free(ptr: *mut c_char) {
    drop(CString::from_raw(ptr));
}

#[tokio::test]
async fn test_session_over_blocking_engine() {
    let session = Session::new(BlockingEngine::new(|payload| answer(&payload)));
    let resp = session.put("https://a.test/x").send().await.unwrap();
    assert_eq!(resp.text(), "PUT");
    assert_eq!(resp.url(), "https://a.test/x");
}

#[tokio::test]
async fn test_session_over_callback_engine() {
    let engine = CallbackEngine::new(|payload, done| {
        tokio::spawn(async move { done(answer(&payload)) });
    });
    let session = Session::new(engine);
    let resp = session.patch("https://a.test/y").send().await.unwrap();
    assert_eq!(resp.text(), "PATCH");
}

#[tokio::test]
async fn test_callback_error_is_transport_failure() {
    let engine = CallbackEngine::new(|_, done| done(Err("dial tcp: timeout".into())));
    let session = Session::new(engine);
    let err = session.get("https://a.test/").send().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err, NetError::EngineFailed("dial tcp: timeout".into()));
}

#[tokio::test]
async fn test_session_over_native_engine() {
    let engine = unsafe { NativeEngine::new(native_request, Some(native_free)) };
    let session = Session::new(engine);
    let resp = session.head("https://a.test/z").send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text(), "HEAD");
}

#[tokio::test]
async fn test_engine_shared_between_sessions() {
    let engine: Arc<dyn Engine> = Arc::new(BlockingEngine::new(|payload| answer(&payload)));
    let a = Session::new(engine.clone());
    let b = Session::new(engine);
    assert_ne!(a.id(), b.id());
    assert_eq!(a.get("https://a.test/").send().await.unwrap().text(), "GET");
    assert_eq!(b.delete("https://b.test/").send().await.unwrap().text(), "DELETE");
}

#[tokio::test]
async fn test_concurrent_calls_on_one_session() {
    let session = Session::new(BlockingEngine::new(|payload| answer(&payload)));
    let (a, b) = tokio::join!(
        session.get("https://a.test/1").send(),
        session.options("https://a.test/2").send()
    );
    assert_eq!(a.unwrap().text(), "GET");
    assert_eq!(b.unwrap().text(), "OPTIONS");
}
