//! Failure shapes produced by the gateway.
//!
//! Every failed request, whether the server answered with an error status or
//! never answered at all, becomes a [`UniformError`]. Callers that decode
//! typed bodies see [`ClientError`], which adds the one failure the gateway
//! cannot normalize: a success body that does not match the expected shape.

use serde::{Deserialize, Serialize};

/// `errorType` used when a failure carries none.
pub const UNKNOWN_ERROR_TYPE: &str = "UNKNOWN_ERROR";

/// `errorMessage` used when a failure carries none.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An error occurred";

/// The normalized error envelope `{errorType, errorMessage}`.
///
/// Both fields are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformError {
    pub error_type: String,
    pub error_message: String,
}

impl UniformError {
    /// Build an error, substituting the defaults for empty fields.
    pub fn new(error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        let error_type = error_type.into();
        let error_message = error_message.into();
        Self {
            error_type: non_empty_or(error_type, UNKNOWN_ERROR_TYPE),
            error_message: non_empty_or(error_message, UNKNOWN_ERROR_MESSAGE),
        }
    }

    /// The fully defaulted error.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ERROR_TYPE, UNKNOWN_ERROR_MESSAGE)
    }

    /// Read the envelope from a raw failure body.
    ///
    /// Missing, null, empty, or non-string fields fall back to the defaults;
    /// a body that is absent or not a JSON object yields [`UniformError::unknown`].
    pub fn from_body(body: &[u8]) -> Self {
        let value: serde_json::Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(_) => return Self::unknown(),
        };
        let field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        Self::new(field("errorType"), field("errorMessage"))
    }

    /// True when `errorType` equals `error_type`.
    pub fn is(&self, error_type: &str) -> bool {
        self.error_type == error_type
    }
}

impl std::fmt::Display for UniformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_type, self.error_message)
    }
}

impl std::error::Error for UniformError {}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Error type for typed API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport or application failure, normalized by the gateway
    Api(UniformError),
    /// A failure without the envelope shape (undecodable success body,
    /// unserializable request body)
    Unexpected(String),
}

impl ClientError {
    pub fn as_api(&self) -> Option<&UniformError> {
        match self {
            ClientError::Api(e) => Some(e),
            ClientError::Unexpected(_) => None,
        }
    }
}

impl From<UniformError> for ClientError {
    fn from(e: UniformError) -> Self {
        ClientError::Api(e)
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Api(e) => write!(f, "{}", e),
            ClientError::Unexpected(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}
