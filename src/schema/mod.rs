//! Record schemas for query binding.
//!
//! A record describes its fields once, through [`QueryRecord::schema`], as an
//! ordered list of bindings. Each binding pairs a [`FieldSpec`] (internal name,
//! query key, default literal) with an accessor returning the field's slot in
//! the record. The declared type of the field is taken from the accessor.
//!
//! # Example
//!
//! ```rust
//! use querybind::{FieldSpec, Presence, QueryRecord, RecordSchema};
//!
//! #[derive(Default)]
//! struct Listing {
//!     status: String,
//!     format: String,
//!     page: i64,
//!     categories: Vec<String>,
//!     location: Option<String>,
//! }
//!
//! impl QueryRecord for Listing {
//!     fn schema() -> RecordSchema<Self> {
//!         RecordSchema::<Self>::new()
//!             .bind(FieldSpec::named("Status").key("status"), |l| &mut l.status)
//!             .bind(FieldSpec::named("Format").key("format").default("json"), |l| &mut l.format)
//!             .bind(FieldSpec::named("Page").key("page").default("1"), |l| &mut l.page)
//!             .bind(FieldSpec::named("Categories").key("categories[]"), |l| &mut l.categories)
//!             .bind(FieldSpec::named("Location").key("location"), |l| &mut l.location)
//!     }
//! }
//!
//! let presence: Vec<_> = Listing::schema().descriptors().map(|d| d.presence()).collect();
//! assert_eq!(
//!     presence,
//!     [
//!         Presence::Required,
//!         Presence::HasDefault,
//!         Presence::HasDefault,
//!         Presence::CollectionDefaultsEmpty,
//!         Presence::Optional,
//!     ]
//! );
//! ```

mod field;
mod field_type;
mod policy;

pub use field::{FieldValue, QueryField, Scalar};
pub use field_type::{FieldType, Kind, Shape};
pub use policy::{allowed_shape, is_allowed};

use crate::error::{ConfigError, ParseError};
use crate::parse::{populate_record, ParseQueryOptions};
use crate::source::QuerySource;

/// Declarative binding information for one field.
///
/// A spec without a [`key`](FieldSpec::key) can be built, but binding it
/// fails with [`ConfigError::MissingKey`] when the schema is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    key: Option<String>,
    default: Option<String>,
}

impl FieldSpec {
    /// Starts a spec for the field with the given internal name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            default: None,
        }
    }

    /// Sets the query key the field is read from.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the raw default literal used when the key is absent.
    ///
    /// For collection fields the literal is split on `,` with no trimming.
    pub fn default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }
}

/// How a field behaves when its key is absent from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Absence is a validation error.
    Required,
    /// Absence falls back to the default literal.
    HasDefault,
    /// Absence leaves the field empty.
    Optional,
    /// Absence yields an empty collection.
    CollectionDefaultsEmpty,
}

/// The resolved schema of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    key: Option<String>,
    field_type: FieldType,
    default: Option<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor from a spec and the field's declared type.
    pub fn new(spec: FieldSpec, field_type: FieldType) -> Self {
        Self {
            name: spec.name,
            key: spec.key,
            field_type,
            default: spec.default,
        }
    }

    /// Internal name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Query key of the field, if declared.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Declared type of the field.
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Raw default literal, if declared.
    pub fn default_literal(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns the field's absence policy.
    pub fn presence(&self) -> Presence {
        if self.default.is_some() {
            return Presence::HasDefault;
        }
        match self.field_type {
            FieldType::Optional(_) => Presence::Optional,
            FieldType::Collection(_) => Presence::CollectionDefaultsEmpty,
            FieldType::Primitive(_) | FieldType::Unsupported(_) => Presence::Required,
        }
    }
}

type Assign<T> = Box<dyn Fn(&mut T, FieldValue) -> bool + Send + Sync>;

/// A descriptor together with the setter that writes into the record.
pub(crate) struct FieldBinding<T> {
    pub(crate) descriptor: FieldDescriptor,
    assign: Assign<T>,
}

impl<T> FieldBinding<T> {
    /// Writes `value` into the bound field of `record`.
    pub(crate) fn assign(&self, record: &mut T, value: FieldValue) -> Result<(), ConfigError> {
        if (self.assign)(record, value) {
            Ok(())
        } else {
            Err(ConfigError::ShapeMismatch {
                field: self.descriptor.name.clone(),
            })
        }
    }
}

/// The ordered field bindings of a record type.
///
/// Fields are processed in the order they were bound.
pub struct RecordSchema<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T> RecordSchema<T> {
    /// Creates a schema with no fields.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Binds a field of the record.
    ///
    /// `accessor` returns the field's slot; its type determines the field's
    /// declared type.
    pub fn bind<V, F>(mut self, spec: FieldSpec, accessor: F) -> Self
    where
        T: 'static,
        V: QueryField + 'static,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let descriptor = FieldDescriptor::new(spec, V::field_type());
        let assign = move |record: &mut T, value: FieldValue| match V::from_field_value(value) {
            Some(converted) => {
                *accessor(record) = converted;
                true
            }
            None => false,
        };
        self.fields.push(FieldBinding {
            descriptor,
            assign: Box::new(assign),
        });
        self
    }

    /// Returns the field descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().map(|binding| &binding.descriptor)
    }

    /// Returns the number of bound fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is bound.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn bindings(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    /// Populates `target` from `source` using this schema.
    ///
    /// See [`parse_query`](crate::parse_query) for the full contract.
    pub fn populate<S>(
        &self,
        source: &S,
        target: &mut T,
        options: Option<&ParseQueryOptions>,
    ) -> Result<(), ParseError>
    where
        S: QuerySource + ?Sized,
    {
        populate_record(self, source, target, options)
    }
}

impl<T> Default for RecordSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A record whose fields can be populated from query parameters.
///
/// Implementors describe their fields once in [`schema`](QueryRecord::schema).
/// The schema is built fresh for every [`parse_query`](crate::parse_query)
/// call; use a [`SchemaRegistry`](crate::SchemaRegistry) to cache it.
pub trait QueryRecord: Sized + 'static {
    /// Returns the record's field bindings in declaration order.
    fn schema() -> RecordSchema<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        name: String,
        tags: Vec<i64>,
        note: Option<bool>,
    }

    fn sample_schema() -> RecordSchema<Sample> {
        RecordSchema::<Sample>::new()
            .bind(FieldSpec::named("Name").key("name"), |s| &mut s.name)
            .bind(FieldSpec::named("Tags").key("tags").default("1,2"), |s| &mut s.tags)
            .bind(FieldSpec::named("Note"), |s| &mut s.note)
    }

    #[test]
    fn test_descriptors_follow_declaration_order() {
        let schema = sample_schema();
        let names: Vec<_> = schema.descriptors().map(FieldDescriptor::name).collect();

        assert_eq!(names, ["Name", "Tags", "Note"]);
        assert_eq!(schema.len(), 3);
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_descriptor_details() {
        let schema = sample_schema();
        let descriptors: Vec<_> = schema.descriptors().collect();

        assert_eq!(descriptors[0].key(), Some("name"));
        assert_eq!(descriptors[0].field_type().to_string(), "String");
        assert_eq!(descriptors[1].default_literal(), Some("1,2"));
        assert_eq!(descriptors[1].field_type().to_string(), "Vec<i64>");
        assert_eq!(descriptors[2].key(), None);
    }

    #[test]
    fn test_presence_policy() {
        let presence: Vec<_> = sample_schema().descriptors().map(|d| d.presence()).collect();
        assert_eq!(
            presence,
            [Presence::Required, Presence::HasDefault, Presence::Optional]
        );
    }

    #[test]
    fn test_binding_assigns_into_record() {
        let schema = sample_schema();
        let mut sample = Sample::default();

        let bindings = schema.bindings();
        bindings[0]
            .assign(&mut sample, FieldValue::Scalar(Scalar::Text("x".into())))
            .unwrap();
        bindings[2]
            .assign(&mut sample, FieldValue::Optional(Some(Scalar::Boolean(true))))
            .unwrap();

        assert_eq!(sample.name, "x");
        assert_eq!(sample.note, Some(true));
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn test_binding_rejects_mismatched_value() {
        let schema = sample_schema();
        let mut sample = Sample::default();

        let result = schema.bindings()[0].assign(&mut sample, FieldValue::Collection(vec![]));
        assert_eq!(
            result,
            Err(ConfigError::ShapeMismatch {
                field: "Name".to_string()
            })
        );
    }
}
