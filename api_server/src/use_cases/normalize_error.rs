use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::entities::ErrorEnvelope;
use crate::domain::errors::{AppError, ErrorMessage};
use crate::domain::ports::Clock;

// Message used when a failure carries nothing usable.
pub const DEFAULT_ERROR_MESSAGE: &str = "INTERNAL_SERVER_ERROR";

const INTERNAL_SERVER_ERROR_STATUS: u16 = 500;

// Turns any classified failure into the envelope written to the client.
pub struct NormalizeErrorUseCase<C> {
    pub clock: C,
}

impl<C> NormalizeErrorUseCase<C>
where
    C: Clock,
{
    pub fn execute(&self, error: &AppError, path: &str) -> ErrorEnvelope {
        ErrorEnvelope {
            status_code: resolve_status(error),
            timestamp: format_timestamp(self.clock.now()),
            path: path.to_string(),
            message: resolve_message(error),
        }
    }
}

pub fn resolve_status(error: &AppError) -> u16 {
    match error {
        AppError::Http { status, .. } if (100..=599).contains(status) => *status,
        _ => INTERNAL_SERVER_ERROR_STATUS,
    }
}

// Structured payload first, then the error's own message, then the default.
pub fn resolve_message(error: &AppError) -> ErrorMessage {
    let (response, message) = match error {
        AppError::Http {
            response, message, ..
        } => (response.clone(), message.clone()),
        AppError::Generic { message } => (None, message.clone()),
        AppError::Unknown => (None, None),
    };

    response
        .filter(ErrorMessage::is_present)
        .or_else(|| {
            message
                .map(ErrorMessage::Text)
                .filter(ErrorMessage::is_present)
        })
        .unwrap_or_else(|| ErrorMessage::from(DEFAULT_ERROR_MESSAGE))
}

// Same shape as `Date.prototype.toISOString`.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
