//! Error types for query binding.
//!
//! Two severities are kept apart: [`ConfigError`] for schema and programmer
//! mistakes that halt a call immediately, and [`QueryValidationError`] for
//! input problems that are accumulated across every field.

mod config_error;
mod validation_error;

pub use config_error::{ConfigError, ParseError};
pub use validation_error::QueryValidationError;
