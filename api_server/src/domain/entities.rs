use serde::Serialize;

use crate::domain::errors::ErrorMessage;

// Uniform JSON body returned for any failure that reaches the error boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    // UTC, millisecond precision, `Z` suffix.
    pub timestamp: String,
    // Original request URL (path and query).
    pub path: String,
    pub message: ErrorMessage,
}
