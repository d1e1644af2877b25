//! Binary-safe body decoding.
//!
//! The engine reply is JSON text, so binary bodies come across base64-encoded
//! alongside their original length (`body_len`). Something between the engine
//! and us may still have run the payload through a lossy UTF-8 pass; this
//! module recovers what it can and records what went wrong as
//! [`ContentAnomaly`] values instead of failing.
//!
//! Decode order:
//! 1. `body_len` present: base64-decode after stripping non-alphabet chars.
//! 2. No `body_len`, binary content type: raw body bytes (legacy path,
//!    may be truncated at NUL bytes by the engine).
//! 3. Otherwise: UTF-8 text.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use bytes::Bytes;
use std::borrow::Cow;

/// Content types treated as binary when the engine did not say so itself.
pub const BINARY_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/zip",
    "application/octet-stream",
    "image/",
    "video/",
    "audio/",
    "application/msword",
    "application/vnd.ms-excel",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument",
    "application/x-binary",
    "application/x-msdownload",
    "application/x-executable",
];

/// Accepts missing or extra padding and non-zero trailing bits, the way
/// lenient decoders on the engine side do.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A non-fatal problem found while decoding a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAnomaly {
    /// Characters outside the base64 alphabet were stripped before decoding.
    Base64Sanitized { removed: usize },
    /// Decoded length differs from the declared `body_len`.
    LengthMismatch { declared: u64, decoded: usize },
    /// Base64 decoding failed outright; the body was kept as text.
    Base64DecodeFailed { reason: String },
    /// Binary content type without `body_len`; bytes may be truncated.
    LegacyBinary { content_type: String },
}

impl std::fmt::Display for ContentAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentAnomaly::Base64Sanitized { removed } => write!(
                f,
                "base64 body contained {removed} invalid characters, likely mangled by UTF-8 processing"
            ),
            ContentAnomaly::LengthMismatch { declared, decoded } => write!(
                f,
                "decoded binary length ({decoded}) does not match expected length ({declared})"
            ),
            ContentAnomaly::Base64DecodeFailed { reason } => {
                write!(f, "base64 decoding failed, falling back to text: {reason}")
            }
            ContentAnomaly::LegacyBinary { content_type } => write!(
                f,
                "binary content ({content_type}) without body_len, content may be truncated at null bytes"
            ),
        }
    }
}

/// Outcome of decoding one body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedBody {
    pub content: Bytes,
    /// Text view. Empty for base64-decoded binary content.
    pub text: String,
    pub is_binary: bool,
    pub anomalies: Vec<ContentAnomaly>,
}

impl DecodedBody {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    fn flag(&mut self, anomaly: ContentAnomaly) {
        tracing::warn!(%anomaly, "content decode anomaly");
        self.anomalies.push(anomaly);
    }
}

pub fn is_binary_content_type(content_type: &str) -> bool {
    if content_type.is_empty() {
        return false;
    }
    let lower = content_type.to_ascii_lowercase();
    BINARY_CONTENT_TYPES.iter().any(|t| lower.contains(t))
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

/// Strip every character outside `[A-Za-z0-9+/=]`.
/// Returns the input untouched (borrowed) when nothing had to go.
pub fn sanitize_base64(body: &str) -> Cow<'_, str> {
    if body.chars().all(is_base64_char) {
        Cow::Borrowed(body)
    } else {
        Cow::Owned(body.chars().filter(|c| is_base64_char(*c)).collect())
    }
}

/// Encode bytes the way the engine does for binary bodies: `(body, body_len)`.
pub fn encode_binary_body(bytes: &[u8]) -> (String, u64) {
    (STANDARD.encode(bytes), bytes.len() as u64)
}

/// Decode a body according to the descriptor's `body_len` and content type.
pub fn decode_body(body: &str, body_len: Option<u64>, content_type: &str) -> DecodedBody {
    match body_len {
        Some(declared) => decode_binary_body(body, declared),
        None if is_binary_content_type(content_type) => decode_legacy_binary(body, content_type),
        None => decode_text_body(body),
    }
}

/// Base64 path. Never fails: on decode error the body is returned as text.
pub fn decode_binary_body(body: &str, declared_len: u64) -> DecodedBody {
    let mut decoded = DecodedBody::default();

    let clean = sanitize_base64(body);
    if let Cow::Owned(ref cleaned) = clean {
        decoded.flag(ContentAnomaly::Base64Sanitized {
            removed: body.chars().count() - cleaned.chars().count(),
        });
    }

    match LENIENT.decode(clean.as_bytes()) {
        Ok(bytes) => {
            if bytes.len() as u64 != declared_len {
                decoded.flag(ContentAnomaly::LengthMismatch {
                    declared: declared_len,
                    decoded: bytes.len(),
                });
            }
            decoded.content = Bytes::from(bytes);
            decoded.is_binary = true;
        }
        Err(e) => {
            decoded.flag(ContentAnomaly::Base64DecodeFailed {
                reason: e.to_string(),
            });
            decoded.content = Bytes::copy_from_slice(body.as_bytes());
            decoded.text = body.to_string();
            decoded.is_binary = false;
        }
    }

    decoded
}

/// Binary content type but no `body_len`: each char is taken as one byte
/// (latin-1), which is all that survives a text-only transport.
pub fn decode_legacy_binary(body: &str, content_type: &str) -> DecodedBody {
    let mut decoded = DecodedBody {
        content: body.chars().map(|c| c as u32 as u8).collect(),
        text: body.to_string(),
        is_binary: true,
        anomalies: Vec::new(),
    };
    decoded.flag(ContentAnomaly::LegacyBinary {
        content_type: content_type.to_string(),
    });
    decoded
}

pub fn decode_text_body(body: &str) -> DecodedBody {
    DecodedBody {
        content: Bytes::copy_from_slice(body.as_bytes()),
        text: body.to_string(),
        is_binary: false,
        anomalies: Vec::new(),
    }
}
