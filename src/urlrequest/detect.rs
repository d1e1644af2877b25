//! Guessing whether a reply will be binary.
//!
//! Only decides how the engine encodes the reply body; the request itself
//! is sent the same way either way.

use crate::http::orderedheaders::OrderedHeaders;
use url::Url;

pub const BINARY_EXTENSIONS: &[&str] = &[
    "pdf", "zip", "exe", "dmg", "pkg", "deb", "rpm", // documents, archives, installers
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", // images
    "mp4", "avi", "mov", "mkv", "mp3", "wav", "flac", // audio, video
    "doc", "docx", "xls", "xlsx", "ppt", "pptx", // office
];

const BINARY_ACCEPT: &[&str] = &[
    "application/pdf",
    "application/octet-stream",
    "image/",
    "video/",
    "audio/",
];

/// Whether the last path segment of `url` has a known binary extension.
pub fn is_likely_binary_url(url: &Url) -> bool {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    match last.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            BINARY_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

pub fn accept_wants_binary(accept: &str) -> bool {
    let accept = accept.to_ascii_lowercase();
    BINARY_ACCEPT.iter().any(|t| accept.contains(t))
}

/// An explicit caller choice wins; otherwise look at the URL, then `Accept`.
pub fn detect_binary_request(explicit: Option<bool>, url: &Url, headers: &OrderedHeaders) -> bool {
    if let Some(binary) = explicit {
        return binary;
    }
    is_likely_binary_url(url) || headers.get("accept").is_some_and(accept_wants_binary)
}
