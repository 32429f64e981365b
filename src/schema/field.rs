//! Typed field values and the [`QueryField`] trait.
//!
//! The binder works on a small dynamic value model ([`Scalar`] and
//! [`FieldValue`]); `QueryField` converts between that model and the Rust
//! type of a record field.

use std::collections::{BTreeMap, HashMap};

use super::field_type::{FieldType, Kind};

/// A single coerced query value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Float value.
    Real(f64),
    /// Boolean value.
    Boolean(bool),
}

impl Scalar {
    /// The zero value of `kind`, used for collection positions that failed coercion.
    pub fn zero(kind: Kind) -> Self {
        match kind {
            Kind::Text => Scalar::Text(String::new()),
            Kind::Integer => Scalar::Integer(0),
            Kind::Real => Scalar::Real(0.0),
            Kind::Boolean => Scalar::Boolean(false),
        }
    }

    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Text(_) => Kind::Text,
            Scalar::Integer(_) => Kind::Integer,
            Scalar::Real(_) => Kind::Real,
            Scalar::Boolean(_) => Kind::Boolean,
        }
    }
}

/// The value produced for one field, matching the field's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Value of a required or defaulted scalar field.
    Scalar(Scalar),
    /// Value of an optional field; `None` when the key was absent.
    Optional(Option<Scalar>),
    /// Values of a collection field, in input order.
    Collection(Vec<Scalar>),
}

/// A Rust type that can appear as a field of a [`QueryRecord`](crate::QueryRecord).
///
/// The crate implements `QueryField` for `String`, `i64`, `f64`, `bool`, and
/// for `Option<T>` and `Vec<T>` of any `QueryField`. It is also implemented for
/// unsigned and narrow integer types, `f32`, `char` and maps, whose
/// [`field_type`](QueryField::field_type) the type policy rejects.
///
/// Nested record types may implement it to be declarable as fields; they are
/// rejected the same way.
///
/// # Example
///
/// ```rust
/// use querybind::{FieldType, QueryField};
///
/// struct Address {
///     city: String,
/// }
///
/// impl QueryField for Address {
///     fn field_type() -> FieldType {
///         FieldType::record("Address")
///     }
/// }
///
/// assert_eq!(Option::<Address>::field_type().to_string(), "Option<Address>");
/// ```
pub trait QueryField: Sized {
    /// The declared type of the field.
    fn field_type() -> FieldType;

    /// Converts a single coerced value into `Self`.
    fn from_scalar(value: Scalar) -> Option<Self> {
        let _ = value;
        None
    }

    /// Converts the value produced for a whole field into `Self`.
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Scalar(scalar) => Self::from_scalar(scalar),
            FieldValue::Optional(_) | FieldValue::Collection(_) => None,
        }
    }
}

impl QueryField for String {
    fn field_type() -> FieldType {
        FieldType::Primitive(Kind::Text)
    }

    fn from_scalar(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl QueryField for i64 {
    fn field_type() -> FieldType {
        FieldType::Primitive(Kind::Integer)
    }

    fn from_scalar(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl QueryField for f64 {
    fn field_type() -> FieldType {
        FieldType::Primitive(Kind::Real)
    }

    fn from_scalar(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Real(x) => Some(x),
            _ => None,
        }
    }
}

impl QueryField for bool {
    fn field_type() -> FieldType {
        FieldType::Primitive(Kind::Boolean)
    }

    fn from_scalar(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl<T: QueryField> QueryField for Option<T> {
    fn field_type() -> FieldType {
        FieldType::Optional(Box::new(T::field_type()))
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Optional(None) => Some(None),
            FieldValue::Optional(Some(scalar)) => T::from_scalar(scalar).map(Some),
            FieldValue::Scalar(_) | FieldValue::Collection(_) => None,
        }
    }
}

impl<T: QueryField> QueryField for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::Collection(Box::new(T::field_type()))
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Collection(items) => items.into_iter().map(T::from_scalar).collect(),
            FieldValue::Scalar(_) | FieldValue::Optional(_) => None,
        }
    }
}

macro_rules! unsupported_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl QueryField for $ty {
                fn field_type() -> FieldType {
                    FieldType::unsupported(stringify!($ty))
                }
            }
        )*
    };
}

unsupported_field!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i128, isize, f32, char);

impl<K, V, S> QueryField for HashMap<K, V, S> {
    fn field_type() -> FieldType {
        FieldType::unsupported("HashMap")
    }
}

impl<K, V> QueryField for BTreeMap<K, V> {
    fn field_type() -> FieldType {
        FieldType::unsupported("BTreeMap")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_field_types() {
        assert_eq!(String::field_type(), FieldType::Primitive(Kind::Text));
        assert_eq!(i64::field_type(), FieldType::Primitive(Kind::Integer));
        assert_eq!(f64::field_type(), FieldType::Primitive(Kind::Real));
        assert_eq!(bool::field_type(), FieldType::Primitive(Kind::Boolean));
    }

    #[test]
    fn test_wrapped_field_types() {
        assert_eq!(Option::<u32>::field_type().to_string(), "Option<u32>");
        assert_eq!(Vec::<u64>::field_type().to_string(), "Vec<u64>");
        assert_eq!(Vec::<Option<i64>>::field_type().to_string(), "Vec<Option<i64>>");
        assert_eq!(
            HashMap::<String, String>::field_type().to_string(),
            "HashMap"
        );
    }

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(
            String::from_field_value(FieldValue::Scalar(Scalar::Text("a".into()))),
            Some("a".to_string())
        );
        assert_eq!(i64::from_field_value(FieldValue::Scalar(Scalar::Integer(3))), Some(3));
        assert_eq!(
            i64::from_field_value(FieldValue::Scalar(Scalar::Text("3".into()))),
            None
        );
        assert_eq!(u64::from_field_value(FieldValue::Scalar(Scalar::Integer(3))), None);
    }

    #[test]
    fn test_optional_conversion() {
        assert_eq!(
            Option::<bool>::from_field_value(FieldValue::Optional(None)),
            Some(None)
        );
        assert_eq!(
            Option::<bool>::from_field_value(FieldValue::Optional(Some(Scalar::Boolean(true)))),
            Some(Some(true))
        );
        assert_eq!(
            Option::<bool>::from_field_value(FieldValue::Scalar(Scalar::Boolean(true))),
            None
        );
    }

    #[test]
    fn test_collection_conversion() {
        let value = FieldValue::Collection(vec![Scalar::Real(1.5), Scalar::Real(2.0)]);
        assert_eq!(Vec::<f64>::from_field_value(value), Some(vec![1.5, 2.0]));

        let mixed = FieldValue::Collection(vec![Scalar::Real(1.5), Scalar::Integer(2)]);
        assert_eq!(Vec::<f64>::from_field_value(mixed), None);
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Scalar::zero(Kind::Text), Scalar::Text(String::new()));
        assert_eq!(Scalar::zero(Kind::Integer), Scalar::Integer(0));
        assert_eq!(Scalar::zero(Kind::Real), Scalar::Real(0.0));
        assert_eq!(Scalar::zero(Kind::Boolean), Scalar::Boolean(false));
        assert_eq!(Scalar::zero(Kind::Real).kind(), Kind::Real);
    }
}
