//! Entry points for binding query parameters to records.

use tracing::{debug, warn};

use crate::error::{ConfigError, ParseError, QueryValidationError};
use crate::populate::populate_field;
use crate::schema::{allowed_shape, QueryRecord, RecordSchema};
use crate::source::QuerySource;
use crate::ValidationResult;

/// Options for [`parse_query`].
///
/// No option is interpreted yet; the type exists so that custom per-field
/// validators can be added without changing the entry point signatures.
/// Passing `None` is equivalent to passing `&ParseQueryOptions::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseQueryOptions {}

impl ParseQueryOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Populates `target` from query parameters.
///
/// Fields are processed in declaration order. For each field the declared
/// type is checked against the type policy, its values are resolved from
/// `source` (or its default literal) and coerced, and the field is written in
/// place.
///
/// # Errors
///
/// - [`ParseError::Config`] as soon as a field has a disallowed type or no
///   query key. Remaining fields are not inspected.
/// - [`ParseError::Validation`] after every field has been processed, if any
///   field was missing or failed coercion. The error holds every message.
///
/// # Example
///
/// ```rust
/// use querybind::{parse_query, FieldSpec, QueryRecord, RecordSchema};
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Search {
///     status: String,
///     format: String,
///     page: i64,
///     is_active: bool,
///     categories: Vec<String>,
///     location: Option<String>,
/// }
///
/// impl QueryRecord for Search {
///     fn schema() -> RecordSchema<Self> {
///         RecordSchema::<Self>::new()
///             .bind(FieldSpec::named("Status").key("status"), |s| &mut s.status)
///             .bind(FieldSpec::named("Format").key("format").default("json"), |s| &mut s.format)
///             .bind(FieldSpec::named("Page").key("page").default("1"), |s| &mut s.page)
///             .bind(FieldSpec::named("IsActive").key("is_active"), |s| &mut s.is_active)
///             .bind(FieldSpec::named("Categories").key("categories[]"), |s| &mut s.categories)
///             .bind(FieldSpec::named("Location").key("location"), |s| &mut s.location)
///     }
/// }
///
/// let params: HashMap<String, Vec<String>> = [
///     ("status", vec!["deployed"]),
///     ("page", vec!["2"]),
///     ("is_active", vec!["true"]),
///     ("categories[]", vec!["abc", "def", "ghi"]),
/// ]
/// .into_iter()
/// .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
/// .collect();
///
/// let mut search = Search::default();
/// parse_query(&params, &mut search, None).unwrap();
///
/// assert_eq!(
///     search,
///     Search {
///         status: "deployed".to_string(),
///         format: "json".to_string(),
///         page: 2,
///         is_active: true,
///         categories: vec!["abc".into(), "def".into(), "ghi".into()],
///         location: None,
///     }
/// );
/// ```
pub fn parse_query<T, S>(
    source: &S,
    target: &mut T,
    options: Option<&ParseQueryOptions>,
) -> Result<(), ParseError>
where
    T: QueryRecord,
    S: QuerySource + ?Sized,
{
    populate_record(&T::schema(), source, target, options)
}

/// Builds a fresh record from query parameters.
///
/// Configuration errors are returned as `Err`; input errors are returned as
/// `Ok(Validation::Failure(_))` carrying every message. The record starts from
/// `T::default()`.
///
/// # Example
///
/// ```rust
/// use querybind::{parse_query_validated, FieldSpec, QueryRecord, RecordSchema};
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default)]
/// struct Paging {
///     page: i64,
///     size: i64,
/// }
///
/// impl QueryRecord for Paging {
///     fn schema() -> RecordSchema<Self> {
///         RecordSchema::<Self>::new()
///             .bind(FieldSpec::named("Page").key("page"), |p| &mut p.page)
///             .bind(FieldSpec::named("Size").key("size").default("20"), |p| &mut p.size)
///     }
/// }
///
/// let params: HashMap<String, Vec<String>> = HashMap::new();
/// let result = parse_query_validated::<Paging, _>(&params).unwrap();
///
/// let errors = result.into_result().unwrap_err();
/// assert_eq!(errors.messages_for("page"), ["field is required"]);
/// ```
pub fn parse_query_validated<T, S>(source: &S) -> Result<ValidationResult<T>, ConfigError>
where
    T: QueryRecord + Default,
    S: QuerySource + ?Sized,
{
    let mut record = T::default();
    match parse_query(source, &mut record, None) {
        Ok(()) => Ok(QueryValidationError::new().into_validation(record)),
        Err(ParseError::Validation(errors)) => Ok(errors.into_validation(record)),
        Err(ParseError::Config(error)) => Err(error),
    }
}

/// Runs the type policy and field populator over every binding of `schema`.
pub(crate) fn populate_record<T, S>(
    schema: &RecordSchema<T>,
    source: &S,
    target: &mut T,
    options: Option<&ParseQueryOptions>,
) -> Result<(), ParseError>
where
    S: QuerySource + ?Sized,
{
    let _options = options.cloned().unwrap_or_default();
    let record = std::any::type_name::<T>();
    let mut errors = QueryValidationError::new();

    for binding in schema.bindings() {
        let descriptor = &binding.descriptor;

        let shape = match allowed_shape(descriptor.field_type()) {
            Some(shape) => shape,
            None => {
                let error = ConfigError::DisallowedType {
                    field: descriptor.name().to_string(),
                    field_type: descriptor.field_type().clone(),
                };
                warn!(record, field = descriptor.name(), %error, "query schema rejected");
                return Err(error.into());
            }
        };

        let value = populate_field(descriptor, shape, source, &mut errors).map_err(|error| {
            warn!(record, field = descriptor.name(), %error, "query schema rejected");
            error
        })?;

        if let Some(value) = value {
            binding.assign(target, value)?;
        }
    }

    if errors.has_errors() {
        debug!(record, errors = errors.len(), "query parameters failed validation");
        return Err(errors.into());
    }

    Ok(())
}
