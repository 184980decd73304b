//! Error types for hydrostore-meta.

/// Error type for decoding and encoding metadata records.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// Returned when a record is valid JSON but not an object.
    #[error("metadata record must be a JSON object, got {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// Wraps an error originating from `serde_json`.
    #[error("metadata json error: {reason}")]
    Json {
        /// Description of the underlying JSON failure.
        reason: String,
    },
}

impl From<serde_json::Error> for MetaError {
    fn from(e: serde_json::Error) -> Self {
        MetaError::Json {
            reason: e.to_string(),
        }
    }
}
