use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::domain::entities::ErrorEnvelope;
use crate::domain::errors::AppError;
use crate::domain::ports::Clock;
use crate::use_cases::NormalizeErrorUseCase;

// System clock adapter; never reports a time earlier than one it already
// handed out, so envelope timestamps stay ordered within the process.
#[derive(Clone)]
pub struct SystemClock {
    high_water_millis: Arc<AtomicI64>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            high_water_millis: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let millis = now.timestamp_millis();
        let previous = self.high_water_millis.fetch_max(millis, Ordering::AcqRel);
        if previous > millis {
            DateTime::from_timestamp_millis(previous).unwrap_or(now)
        } else {
            now
        }
    }
}

// Shared state of the global error boundary.
#[derive(Clone)]
pub struct ErrorBoundary {
    clock: Arc<dyn Clock>,
}

impl ErrorBoundary {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }

    pub fn envelope(&self, error: &AppError, path: &str) -> ErrorEnvelope {
        let use_case = NormalizeErrorUseCase {
            clock: Arc::clone(&self.clock),
        };
        use_case.execute(error, path)
    }
}

impl Clock for Arc<dyn Clock> {
    fn now(&self) -> DateTime<Utc> {
        self.as_ref().now()
    }
}
