use thiserror::Error;

/// Coarse classification of a [`NetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input, rejected before the engine is called.
    Validation,
    /// The engine errored or produced nothing.
    Transport,
    /// The engine replied with the status-0 sentinel.
    EngineReported,
    /// The engine's reply could not be decoded.
    Parse,
    /// Opt-in status assertion failed.
    HttpStatus,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetError {
    // Validation Errors
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("Invalid fingerprint profile: {0}")]
    InvalidProfile(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Transport Errors
    #[error("Engine call failed: {0}")]
    EngineFailed(String),
    #[error("No response received")]
    EmptyResponse,

    // The engine's own message, verbatim.
    #[error("{0}")]
    EngineReported(String),

    #[error("Failed to parse response from engine: {reason} (payload: {preview})")]
    ResponseParse { reason: String, preview: String },

    #[error("Request failed with status code {status}")]
    HttpStatus { status: u16, reason: Option<String> },
}

/// Number of payload characters kept in a [`NetError::ResponseParse`] preview.
pub const PREVIEW_CHARS: usize = 200;

impl NetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetError::InvalidUrl { .. }
            | NetError::InvalidMethod(_)
            | NetError::InvalidProfile(_)
            | NetError::InvalidRequest(_) => ErrorKind::Validation,
            NetError::EngineFailed(_) | NetError::EmptyResponse => ErrorKind::Transport,
            NetError::EngineReported(_) => ErrorKind::EngineReported,
            NetError::ResponseParse { .. } => ErrorKind::Parse,
            NetError::HttpStatus { .. } => ErrorKind::HttpStatus,
        }
    }

    /// Engine-reported failures count as transport failures from the caller's side.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Transport | ErrorKind::EngineReported
        )
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        NetError::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_profile(reason: impl Into<String>) -> Self {
        NetError::InvalidProfile(reason.into())
    }

    pub fn engine_failed(reason: impl ToString) -> Self {
        NetError::EngineFailed(reason.to_string())
    }

    /// Build a parse failure carrying a bounded prefix of the raw payload.
    pub fn response_parse(reason: impl ToString, payload: &str) -> Self {
        let mut preview: String = payload.chars().take(PREVIEW_CHARS).collect();
        if payload.chars().nth(PREVIEW_CHARS).is_some() {
            preview.push_str("...");
        }
        NetError::ResponseParse {
            reason: reason.to_string(),
            preview,
        }
    }

    /// Status code carried by an HTTP status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
