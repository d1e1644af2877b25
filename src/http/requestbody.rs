//! Request body selection for POST/PUT-style calls.

use crate::base::neterror::NetError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Body carried in a request descriptor.
///
/// The engine takes the body as a string, so only textual encodings exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Serialized JSON document.
    Json(String),
    /// URL-encoded form.
    Form(String),
}

impl RequestBody {
    /// Pick the body for a call. A JSON payload wins over form data when
    /// both are supplied.
    pub fn select(
        json: Option<&serde_json::Value>,
        form: Option<&[(String, String)]>,
    ) -> Result<Self, NetError> {
        if let Some(value) = json {
            let text = serde_json::to_string(value)
                .map_err(|e| NetError::InvalidRequest(format!("unserializable JSON body: {e}")))?;
            return Ok(RequestBody::Json(text));
        }
        if let Some(pairs) = form {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            return Ok(RequestBody::Form(encoded));
        }
        Ok(RequestBody::Empty)
    }

    /// Content type implied by the body, if any.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some(CONTENT_TYPE_JSON),
            RequestBody::Form(_) => Some(CONTENT_TYPE_FORM),
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(s) | RequestBody::Form(s) => Some(s),
        }
    }
}
