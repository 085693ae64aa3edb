// Domain layer: failure classification and the error envelope.

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::ErrorEnvelope;
pub use errors::{AppError, ErrorMessage};
pub use ports::Clock;
