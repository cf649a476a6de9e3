//! Standard API response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Success body for endpoints that only acknowledge an action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkBody {
    /// Always `true`
    pub ok: bool,
}

impl OkBody {
    /// The canonical success body
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkBody {
    fn default() -> Self {
        Self::new()
    }
}

/// Error body returned by all failing endpoints
///
/// Security-relevant failures share generic messages; the body never
/// distinguishes a session that expired from one that never existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code for programmatic handling
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Field-level validation errors, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            fields: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the names of invalid fields
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }
}
