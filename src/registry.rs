//! Schema registry for cached and type-erased record binding.
//!
//! This module provides the [`SchemaRegistry`] type that caches the schema of
//! each registered record type and lets callers bind records they only hold
//! as `dyn Any`.

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ConfigError, ParseError};
use crate::parse::ParseQueryOptions;
use crate::schema::{QueryRecord, RecordSchema};
use crate::source::QuerySource;

/// Type alias for the schema storage map.
type SchemaMap = Arc<RwLock<HashMap<TypeId, Arc<dyn ErasedSchema>>>>;

/// A record schema with its record type erased.
trait ErasedSchema: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn populate_dyn(
        &self,
        source: &dyn QuerySource,
        target: &mut dyn Any,
        options: Option<&ParseQueryOptions>,
    ) -> Result<(), ParseError>;
}

impl<T: QueryRecord> ErasedSchema for RecordSchema<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn populate_dyn(
        &self,
        source: &dyn QuerySource,
        target: &mut dyn Any,
        options: Option<&ParseQueryOptions>,
    ) -> Result<(), ParseError> {
        let target = target
            .downcast_mut::<T>()
            .ok_or(ConfigError::InvalidTarget)?;
        self.populate(source, target, options)
    }
}

/// A thread-safe cache of record schemas.
///
/// [`parse_query`](crate::parse_query) rebuilds a record's schema on every
/// call. The registry builds it once per record type and reuses it; results
/// are identical either way.
///
/// The registry also offers [`parse_any`](SchemaRegistry::parse_any) for
/// callers that hold the target as `dyn Any`, such as handler frameworks that
/// pick the record type at run time.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can bind records concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// # Example
///
/// ```rust
/// use querybind::{FieldSpec, QueryRecord, RecordSchema, SchemaRegistry};
/// use std::collections::HashMap;
///
/// #[derive(Default)]
/// struct Paging {
///     page: i64,
/// }
///
/// impl QueryRecord for Paging {
///     fn schema() -> RecordSchema<Self> {
///         RecordSchema::<Self>::new()
///             .bind(FieldSpec::named("Page").key("page").default("1"), |p| &mut p.page)
///     }
/// }
///
/// let registry = SchemaRegistry::new();
/// registry.register::<Paging>().unwrap();
///
/// let params: HashMap<String, Vec<String>> = HashMap::new();
/// let mut paging = Paging::default();
/// registry.parse(&params, &mut paging, None).unwrap();
/// assert_eq!(paging.page, 1);
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
}

impl SchemaRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Builds and caches the schema of `T`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateRecord` if `T` is already registered.
    pub fn register<T: QueryRecord>(&self) -> Result<(), RegistryError> {
        let mut schemas = self.schemas.write();
        let type_id = TypeId::of::<T>();

        if schemas.contains_key(&type_id) {
            return Err(RegistryError::DuplicateRecord(
                std::any::type_name::<T>().to_string(),
            ));
        }

        schemas.insert(type_id, Arc::new(T::schema()));
        Ok(())
    }

    /// Returns true if `T` has been registered.
    pub fn contains<T: QueryRecord>(&self) -> bool {
        self.schemas.read().contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered record types.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true if no record type is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Populates `target` using the cached schema of `T`.
    ///
    /// `T` is registered on first use. Semantics match
    /// [`parse_query`](crate::parse_query).
    pub fn parse<T, S>(
        &self,
        source: &S,
        target: &mut T,
        options: Option<&ParseQueryOptions>,
    ) -> Result<(), ParseError>
    where
        T: QueryRecord,
        S: QuerySource + ?Sized,
    {
        let schema = self.schema_for::<T>();
        match schema.as_any().downcast_ref::<RecordSchema<T>>() {
            Some(schema) => schema.populate(source, target, options),
            None => Err(ConfigError::InvalidTarget.into()),
        }
    }

    /// Populates a record held as `dyn Any`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] if `target` is `None` or its type
    /// has not been registered. Otherwise behaves like
    /// [`parse_query`](crate::parse_query).
    ///
    /// # Example
    ///
    /// ```rust
    /// use querybind::{ConfigError, ParseError, SchemaRegistry};
    /// use std::any::Any;
    /// use std::collections::HashMap;
    ///
    /// let registry = SchemaRegistry::new();
    /// let params: HashMap<String, Vec<String>> = HashMap::new();
    /// let mut not_a_record = String::new();
    ///
    /// let result = registry.parse_any(&params, Some(&mut not_a_record as &mut dyn Any), None);
    /// assert_eq!(result, Err(ParseError::Config(ConfigError::InvalidTarget)));
    ///
    /// let result = registry.parse_any(&params, None, None);
    /// assert_eq!(result, Err(ParseError::Config(ConfigError::InvalidTarget)));
    /// ```
    pub fn parse_any(
        &self,
        source: &dyn QuerySource,
        target: Option<&mut dyn Any>,
        options: Option<&ParseQueryOptions>,
    ) -> Result<(), ParseError> {
        let target = target.ok_or(ConfigError::InvalidTarget)?;
        let schema = self
            .schemas
            .read()
            .get(&(*target).type_id())
            .cloned()
            .ok_or(ConfigError::InvalidTarget)?;

        schema.populate_dyn(source, target, options)
    }

    fn schema_for<T: QueryRecord>(&self) -> Arc<dyn ErasedSchema> {
        let type_id = TypeId::of::<T>();
        if let Some(schema) = self.schemas.read().get(&type_id) {
            return Arc::clone(schema);
        }

        let mut schemas = self.schemas.write();
        Arc::clone(
            schemas
                .entry(type_id)
                .or_insert_with(|| Arc::new(T::schema()) as Arc<dyn ErasedSchema>),
        )
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a record type that is already registered.
    #[error("record '{0}' already registered")]
    DuplicateRecord(String),
}
