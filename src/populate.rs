//! Field population: value resolution and coercion for a single field.
//!
//! For each field the populator resolves the raw values (input, default
//! literal, or absent), coerces them to the field's kind, and either returns
//! the value to write or records messages in the accumulator. Only schema
//! problems are returned as errors; input problems never stop processing.

use std::borrow::Cow;

use tracing::trace;

use crate::error::{ConfigError, QueryValidationError};
use crate::schema::{FieldDescriptor, FieldValue, Kind, Scalar, Shape};
use crate::source::QuerySource;

const REQUIRED_MESSAGE: &str = "field is required";

/// Resolves, coerces and returns the value for one field.
///
/// Returns `Ok(None)` when nothing should be written: a required field is
/// missing, or a scalar or optional value failed coercion. In both cases the
/// reason has been recorded in `errors` under the field's key.
pub(crate) fn populate_field<S>(
    descriptor: &FieldDescriptor,
    shape: Shape,
    source: &S,
    errors: &mut QueryValidationError,
) -> Result<Option<FieldValue>, ConfigError>
where
    S: QuerySource + ?Sized,
{
    let key = descriptor.key().ok_or_else(|| ConfigError::MissingKey {
        field: descriptor.name().to_string(),
    })?;

    let values = match resolve_values(descriptor, shape, key, source) {
        Some(values) => values,
        None => return Ok(absent_value(shape, key, errors)),
    };
    trace!(field = descriptor.name(), key, count = values.len(), "resolved query values");

    let value = match shape {
        Shape::Scalar(kind) => coerce_first(kind, &values, key, errors).map(FieldValue::Scalar),
        Shape::Optional(kind) => coerce_first(kind, &values, key, errors)
            .map(|scalar| FieldValue::Optional(Some(scalar))),
        Shape::Collection(kind) => {
            Some(FieldValue::Collection(coerce_all(kind, &values, key, errors)))
        }
    };

    Ok(value)
}

/// Returns the raw values for a field, or `None` if the key is absent and no
/// default is declared.
///
/// A key given with an empty value list counts as absent.
fn resolve_values<'a, S>(
    descriptor: &FieldDescriptor,
    shape: Shape,
    key: &str,
    source: &'a S,
) -> Option<Cow<'a, [String]>>
where
    S: QuerySource + ?Sized,
{
    if let Some(values) = source.query_values(key).filter(|values| !values.is_empty()) {
        return Some(Cow::Borrowed(values));
    }

    let literal = descriptor.default_literal()?;
    let values = match shape {
        Shape::Collection(_) => literal.split(',').map(str::to_string).collect(),
        Shape::Scalar(_) | Shape::Optional(_) => vec![literal.to_string()],
    };
    Some(Cow::Owned(values))
}

/// The value written when a key is absent with no default.
fn absent_value(shape: Shape, key: &str, errors: &mut QueryValidationError) -> Option<FieldValue> {
    match shape {
        Shape::Collection(_) => Some(FieldValue::Collection(Vec::new())),
        Shape::Optional(_) => Some(FieldValue::Optional(None)),
        Shape::Scalar(_) => {
            errors.record_field_error(key, REQUIRED_MESSAGE);
            None
        }
    }
}

/// Coerces the first value; any further values are ignored.
fn coerce_first(
    kind: Kind,
    values: &[String],
    key: &str,
    errors: &mut QueryValidationError,
) -> Option<Scalar> {
    let raw = values.first()?;
    let scalar = coerce(kind, raw);
    if scalar.is_none() {
        errors.record_field_error(key, invalid_message(kind));
    }
    scalar
}

/// Coerces every value, recording one message per failing index.
///
/// Failed positions hold the kind's zero value.
fn coerce_all(
    kind: Kind,
    values: &[String],
    key: &str,
    errors: &mut QueryValidationError,
) -> Vec<Scalar> {
    values
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            coerce(kind, raw).unwrap_or_else(|| {
                errors.record_field_error(
                    key,
                    format!("(Index: {}) {}", index, invalid_message(kind)),
                );
                Scalar::zero(kind)
            })
        })
        .collect()
}

fn invalid_message(kind: Kind) -> String {
    format!("must be a valid {}", kind.description())
}

/// Converts raw query text into a value of `kind`.
///
/// Conversion is locale-independent. Returns `None` if `raw` is not a valid
/// literal of the kind.
pub fn coerce(kind: Kind, raw: &str) -> Option<Scalar> {
    match kind {
        Kind::Text => Some(Scalar::Text(raw.to_string())),
        Kind::Integer => raw.parse::<i64>().ok().map(Scalar::Integer),
        Kind::Real => parse_real(raw).map(Scalar::Real),
        Kind::Boolean => parse_bool(raw).map(Scalar::Boolean),
    }
}

/// Parses a float, rejecting finite literals that overflow to infinity.
///
/// Accepts decimal literals and hexadecimal literals with a binary exponent
/// (`0x1.8p3`).
fn parse_real(raw: &str) -> Option<f64> {
    let value = match raw.parse::<f64>() {
        Ok(value) => value,
        Err(_) => return parse_hex_real(raw),
    };
    if value.is_infinite() {
        let unsigned = raw.trim_start_matches(['+', '-']);
        if !unsigned.get(..3)?.eq_ignore_ascii_case("inf") {
            return None;
        }
    }
    Some(value)
}

/// Parses `[sign] 0x mantissa p exponent`. The exponent is mandatory.
fn parse_hex_real(raw: &str) -> Option<f64> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let body = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))?;
    let (mantissa, exponent) = body.split_once(['p', 'P'])?;
    let exponent: i32 = exponent.parse().ok()?;

    let (integral, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integral.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for digit in integral.chars().chain(fraction.chars()) {
        value = value * 16.0 + f64::from(digit.to_digit(16)?);
    }

    let fraction_bits = i32::try_from(fraction.len()).ok()?.checked_mul(4)?;
    let value = scale_by_power_of_two(value, exponent.checked_sub(fraction_bits)?);
    if value.is_infinite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Computes `value * 2^exponent` without overflowing the intermediate power.
fn scale_by_power_of_two(mut value: f64, mut exponent: i32) -> f64 {
    const STEP: i32 = 1000;
    while exponent > STEP && value.is_finite() {
        value *= 2f64.powi(STEP);
        exponent -= STEP;
    }
    while exponent < -STEP && value != 0.0 {
        value *= 2f64.powi(-STEP);
        exponent += STEP;
    }
    value * 2f64.powi(exponent)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
