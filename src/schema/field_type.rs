//! Declared field types and the shapes the binder understands.

use std::borrow::Cow;
use std::fmt::{self, Display};

/// The primitive kinds a query value can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Text, stored as given.
    Text,
    /// A signed 64-bit integer.
    Integer,
    /// A double-precision float.
    Real,
    /// A boolean.
    Boolean,
}

impl Kind {
    /// Name used in validation messages.
    pub fn description(&self) -> &'static str {
        match self {
            Kind::Text => "string",
            Kind::Integer => "integer",
            Kind::Real => "float",
            Kind::Boolean => "boolean",
        }
    }

    /// Rust type the kind binds to.
    pub fn rust_type(&self) -> &'static str {
        match self {
            Kind::Text => "String",
            Kind::Integer => "i64",
            Kind::Real => "f64",
            Kind::Boolean => "bool",
        }
    }
}

/// The declared type of a record field.
///
/// `FieldType` describes any field a schema may bind, including types the
/// binder cannot fill. Those are still representable so that the type policy
/// can reject them with a configuration error naming the offending type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// One of the supported primitive kinds.
    Primitive(Kind),
    /// `Option<T>` of the inner type.
    Optional(Box<FieldType>),
    /// `Vec<T>` of the inner type.
    Collection(Box<FieldType>),
    /// Any type the binder has no coercion for (unsigned integers, maps, nested records).
    Unsupported(Cow<'static, str>),
}

impl FieldType {
    /// Creates an unsupported type with the given display name.
    pub fn unsupported(name: impl Into<Cow<'static, str>>) -> Self {
        FieldType::Unsupported(name.into())
    }

    /// Alias of [`FieldType::unsupported`] for nested record types.
    ///
    /// The result is identical to `unsupported(name)`: nested records are
    /// never bindable and are rejected like any other unsupported type.
    pub fn record(name: impl Into<Cow<'static, str>>) -> Self {
        FieldType::Unsupported(name.into())
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(kind) => write!(f, "{}", kind.rust_type()),
            FieldType::Optional(inner) => write!(f, "Option<{}>", inner),
            FieldType::Collection(inner) => write!(f, "Vec<{}>", inner),
            FieldType::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

/// A field type the binder accepts, reduced to its layout and element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single required value.
    Scalar(Kind),
    /// A single value that may be absent.
    Optional(Kind),
    /// Every value given for the key, in order.
    Collection(Kind),
}

impl Shape {
    /// The element kind of the shape.
    pub fn kind(&self) -> Kind {
        match self {
            Shape::Scalar(kind) | Shape::Optional(kind) | Shape::Collection(kind) => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_rust_syntax() {
        assert_eq!(FieldType::Primitive(Kind::Text).to_string(), "String");
        assert_eq!(
            FieldType::Optional(Box::new(FieldType::Primitive(Kind::Integer))).to_string(),
            "Option<i64>"
        );
        assert_eq!(
            FieldType::Collection(Box::new(FieldType::unsupported("u8"))).to_string(),
            "Vec<u8>"
        );
        assert_eq!(FieldType::record("Address").to_string(), "Address");
    }

    #[test]
    fn test_record_is_unsupported_alias() {
        assert_eq!(
            FieldType::record("Address"),
            FieldType::unsupported("Address")
        );
    }

    #[test]
    fn test_shape_kind() {
        assert_eq!(Shape::Scalar(Kind::Real).kind(), Kind::Real);
        assert_eq!(Shape::Collection(Kind::Boolean).kind(), Kind::Boolean);
    }
}
