use crate::base::neterror::{ErrorKind, NetError, PREVIEW_CHARS};

#[test]
fn test_error_kinds() {
    assert_eq!(
        NetError::invalid_profile("both").kind(),
        ErrorKind::Validation
    );
    assert_eq!(NetError::EmptyResponse.kind(), ErrorKind::Transport);
    assert_eq!(
        NetError::EngineReported("x".into()).kind(),
        ErrorKind::EngineReported
    );
    assert_eq!(
        NetError::response_parse("eof", "{").kind(),
        ErrorKind::Parse
    );
}

#[test]
fn test_engine_reported_is_transport() {
    assert!(NetError::EngineReported("connect: refused".into()).is_transport());
    assert!(NetError::engine_failed("boom").is_transport());
    assert!(!NetError::response_parse("eof", "").is_transport());
}

#[test]
fn test_engine_reported_message_verbatim() {
    let err = NetError::EngineReported("connect: refused".into());
    assert_eq!(err.to_string(), "connect: refused");
}

#[test]
fn test_parse_preview_truncated() {
    let payload = "x".repeat(PREVIEW_CHARS + 50);
    match NetError::response_parse("bad", &payload) {
        NetError::ResponseParse { preview, .. } => {
            assert_eq!(preview.len(), PREVIEW_CHARS + 3);
            assert!(preview.ends_with("..."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_preview_short_payload_kept_whole() {
    match NetError::response_parse("bad", "not json") {
        NetError::ResponseParse { preview, .. } => assert_eq!(preview, "not json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_http_status_carries_code() {
    let err = NetError::HttpStatus {
        status: 404,
        reason: Some("Not Found".into()),
    };
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Request failed with status code 404");
}
