//! Configuration errors and the combined parse error.

use crate::schema::FieldType;

use super::QueryValidationError;

/// A schema or programmer mistake detected while binding a record.
///
/// Configuration errors halt the call at the first offending field. They are
/// meant to be fixed during development, not recovered from at run time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The target is absent or is not a record known to the caller's registry.
    #[error("target argument must be a non-null reference to a registered query record")]
    InvalidTarget,

    /// A field declares a type outside the allowed set.
    #[error("field type is not allowed for query parsing: {field} ({field_type})")]
    DisallowedType {
        /// Internal name of the field.
        field: String,
        /// The declared type of the field.
        field_type: FieldType,
    },

    /// A field does not declare the query key it is bound to.
    #[error("query key not declared for record field: {field}")]
    MissingKey {
        /// Internal name of the field.
        field: String,
    },

    /// A field's `QueryField` implementation rejected a value of its own declared type.
    #[error("field value does not match its declared type: {field}")]
    ShapeMismatch {
        /// Internal name of the field.
        field: String,
    },
}

/// The error returned by the query binding entry points.
///
/// Callers are expected to tell the two kinds apart, typically answering a
/// [`ParseError::Validation`] with a client error and a
/// [`ParseError::Config`] with a server error.
///
/// # Example
///
/// ```rust
/// use querybind::{parse_query, FieldSpec, ParseError, QueryRecord, RecordSchema};
/// use std::collections::HashMap;
///
/// #[derive(Default)]
/// struct Paging {
///     page: i64,
/// }
///
/// impl QueryRecord for Paging {
///     fn schema() -> RecordSchema<Self> {
///         RecordSchema::<Self>::new().bind(FieldSpec::named("page").key("page"), |p| &mut p.page)
///     }
/// }
///
/// let params = HashMap::from([("page".to_string(), vec!["two".to_string()])]);
/// let mut paging = Paging::default();
///
/// match parse_query(&params, &mut paging, None) {
///     Err(ParseError::Validation(errors)) => {
///         assert_eq!(errors.messages_for("page"), ["must be a valid integer"]);
///     }
///     other => panic!("unexpected result: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The schema or target is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input failed one or more field rules.
    #[error(transparent)]
    Validation(#[from] QueryValidationError),
}

impl ParseError {
    /// Returns true for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, ParseError::Config(_))
    }

    /// Returns true for accumulated validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, ParseError::Validation(_))
    }

    /// Returns the accumulated validation errors, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&QueryValidationError> {
        match self {
            ParseError::Validation(errors) => Some(errors),
            ParseError::Config(_) => None,
        }
    }

    /// Consumes the error, returning the accumulated validation errors if any.
    pub fn into_validation(self) -> Option<QueryValidationError> {
        match self {
            ParseError::Validation(errors) => Some(errors),
            ParseError::Config(_) => None,
        }
    }

    /// Returns the configuration error, if this is one.
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            ParseError::Config(error) => Some(error),
            ParseError::Validation(_) => None,
        }
    }
}
