use std::fmt;

use serde::Serialize;

// Message carried by an error payload: a single text, or the list of
// violations reported by request validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    List(Vec<String>),
}

impl ErrorMessage {
    // Empty text counts as no message at all.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::List(_) => true,
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for ErrorMessage {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::List(items) => f.write_str(&items.join("; ")),
        }
    }
}

/// Failures that can reach the global error boundary.
///
/// The set is closed: every failure is classified into one of these
/// variants before an envelope is rendered for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    /// Error that declares its HTTP status and optionally a structured
    /// response payload. `status` is only honoured when it is a valid
    /// HTTP status code.
    Http {
        status: u16,
        response: Option<ErrorMessage>,
        message: Option<String>,
    },
    /// Any other error; it may still carry a message of its own.
    Generic { message: Option<String> },
    /// A failure with nothing to say about itself.
    Unknown,
}

impl AppError {
    pub fn http(status: u16, message: impl Into<ErrorMessage>) -> Self {
        Self::Http {
            status,
            response: Some(message.into()),
            message: None,
        }
    }

    pub fn bad_request(message: impl Into<ErrorMessage>) -> Self {
        Self::http(400, message)
    }

    pub fn not_found(message: impl Into<ErrorMessage>) -> Self {
        Self::http(404, message)
    }

    // Request validation reports every violation at once.
    pub fn validation(violations: Vec<String>) -> Self {
        Self::http(400, ErrorMessage::List(violations))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Generic {
            message: Some(message.into()),
        }
    }

    pub fn unknown() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http {
                status,
                response: Some(response),
                ..
            } => write!(f, "http error {status}: {response}"),
            Self::Http {
                status,
                message: Some(message),
                ..
            } => write!(f, "http error {status}: {message}"),
            Self::Http { status, .. } => write!(f, "http error {status}"),
            Self::Generic {
                message: Some(message),
            } => f.write_str(message),
            Self::Generic { message: None } | Self::Unknown => f.write_str("unknown error"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::internal(e.to_string())
    }
}
