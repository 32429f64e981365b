//! Type policy: which declared field types may be bound.
//!
//! The binder accepts exactly text, integer, float and boolean fields, plus
//! the `Option` and `Vec` of each. Nested wrappers such as `Option<Vec<_>>`
//! are rejected along with every other type.

use super::field_type::{FieldType, Shape};

/// Returns the bindable shape of `field_type`, or `None` if the type is not allowed.
///
/// # Example
///
/// ```rust
/// use querybind::{allowed_shape, FieldType, Kind, Shape};
///
/// let roles = FieldType::Collection(Box::new(FieldType::Primitive(Kind::Text)));
/// assert_eq!(allowed_shape(&roles), Some(Shape::Collection(Kind::Text)));
///
/// assert_eq!(allowed_shape(&FieldType::unsupported("u64")), None);
/// ```
pub fn allowed_shape(field_type: &FieldType) -> Option<Shape> {
    match field_type {
        FieldType::Primitive(kind) => Some(Shape::Scalar(*kind)),
        FieldType::Optional(inner) => match inner.as_ref() {
            FieldType::Primitive(kind) => Some(Shape::Optional(*kind)),
            _ => None,
        },
        FieldType::Collection(inner) => match inner.as_ref() {
            FieldType::Primitive(kind) => Some(Shape::Collection(*kind)),
            _ => None,
        },
        FieldType::Unsupported(_) => None,
    }
}

/// Returns true if fields of `field_type` may be bound from query parameters.
pub fn is_allowed(field_type: &FieldType) -> bool {
    allowed_shape(field_type).is_some()
}
