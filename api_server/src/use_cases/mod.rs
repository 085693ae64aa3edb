// Use cases: application rules on top of the domain types.

pub mod normalize_error;

#[cfg(test)]
pub(crate) mod test_support;

pub use normalize_error::{DEFAULT_ERROR_MESSAGE, NormalizeErrorUseCase};
