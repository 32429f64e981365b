//! # Querybind
//!
//! Binds URL query parameters to typed records, accumulating ALL validation
//! errors instead of stopping at the first bad parameter.
//!
//! ## Overview
//!
//! Query decoders hand over a map from key to an ordered list of values.
//! Querybind turns that map into a record using declarative per-field rules:
//! the query key a field is read from, an optional default literal, and the
//! field's type, which decides whether it is required, optional, or a
//! collection. Every field is always attempted, so a single call reports every
//! missing or malformed parameter.
//!
//! Two kinds of failure are kept apart:
//!
//! - [`ConfigError`]: the schema itself is wrong (a field type the binder
//!   cannot fill, a field without a query key). Returned immediately.
//! - [`QueryValidationError`]: the input is wrong. Messages are grouped by
//!   query key and returned together once all fields are processed.
//!
//! ## Core Types
//!
//! - [`QueryRecord`]: implemented by records that can be populated
//! - [`RecordSchema`] and [`FieldSpec`]: the ordered field bindings of a record
//! - [`QuerySource`]: the input dictionary
//! - [`parse_query`]: the entry point
//! - [`SchemaRegistry`]: caches schemas and binds type-erased targets
//!
//! ## Example
//!
//! ```rust
//! use querybind::{parse_query, FieldSpec, ParseError, QueryRecord, RecordSchema};
//! use std::collections::HashMap;
//!
//! #[derive(Default)]
//! struct Query {
//!     status: String,
//!     page: i64,
//!     numbers: Vec<i64>,
//! }
//!
//! impl QueryRecord for Query {
//!     fn schema() -> RecordSchema<Self> {
//!         RecordSchema::<Self>::new()
//!             .bind(FieldSpec::named("Status").key("status"), |q| &mut q.status)
//!             .bind(FieldSpec::named("Page").key("page"), |q| &mut q.page)
//!             .bind(FieldSpec::named("Numbers").key("numbers[]"), |q| &mut q.numbers)
//!     }
//! }
//!
//! let mut params = HashMap::new();
//! params.insert("page".to_string(), vec!["aaa".to_string()]);
//! params.insert(
//!     "numbers[]".to_string(),
//!     ["1", "2", "aaa", "4", "a"].iter().map(|s| s.to_string()).collect(),
//! );
//!
//! let mut query = Query::default();
//! let errors = match parse_query(&params, &mut query, None) {
//!     Err(ParseError::Validation(errors)) => errors,
//!     other => panic!("expected validation errors, got {:?}", other),
//! };
//!
//! assert!(errors.struct_errors.is_empty());
//! assert_eq!(errors.messages_for("page"), ["must be a valid integer"]);
//! assert_eq!(errors.messages_for("status"), ["field is required"]);
//! assert_eq!(
//!     errors.messages_for("numbers[]"),
//!     ["(Index: 2) must be a valid integer", "(Index: 4) must be a valid integer"]
//! );
//! ```

pub mod error;
pub mod parse;
pub mod registry;
pub mod schema;
pub mod source;

mod populate;

pub use error::{ConfigError, ParseError, QueryValidationError};
pub use parse::{parse_query, parse_query_validated, ParseQueryOptions};
pub use populate::coerce;
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    allowed_shape, is_allowed, FieldDescriptor, FieldSpec, FieldType, FieldValue, Kind, Presence,
    QueryField, QueryRecord, RecordSchema, Scalar, Shape,
};
pub use source::QuerySource;

/// Type alias for binding results that carry accumulated validation errors.
pub type ValidationResult<T> = stillwater::Validation<T, QueryValidationError>;
