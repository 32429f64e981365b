//! Accumulated validation errors.
//!
//! This module provides [`QueryValidationError`], the accumulator that collects
//! every input problem found while binding query parameters to a record.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use stillwater::prelude::*;
use stillwater::Validation;

/// Validation errors collected while binding query parameters.
///
/// Messages are grouped by the external query key of the field they belong to.
/// Within a key, messages keep the order in which they were recorded, so
/// per-element failures of a collection field appear in ascending index order.
/// Callers must not rely on the order of distinct keys.
///
/// `struct_errors` holds whole-record messages. No rule produces them yet, but
/// the list is always initialized so callers can inspect it unconditionally.
///
/// # Example
///
/// ```rust
/// use querybind::QueryValidationError;
///
/// let mut errors = QueryValidationError::new();
/// errors.record_field_error("page", "must be a valid integer");
/// errors.record_field_error("numbers[]", "(Index: 2) must be a valid integer");
///
/// assert!(errors.has_errors());
/// assert_eq!(errors.messages_for("page"), ["must be a valid integer"]);
/// assert!(errors.struct_errors.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValidationError {
    /// Messages for fields with at least one error, keyed by query key.
    pub field_errors: IndexMap<String, Vec<String>>,
    /// Whole-record messages.
    pub struct_errors: Vec<String>,
}

impl QueryValidationError {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the list kept for `key`.
    pub fn record_field_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(key.into())
            .or_default()
            .push(message.into());
    }

    /// Appends a whole-record message.
    pub fn record_struct_error(&mut self, message: impl Into<String>) {
        self.struct_errors.push(message.into());
    }

    /// Returns true once any message has been recorded in either group.
    pub fn has_errors(&self) -> bool {
        !self.field_errors.is_empty() || !self.struct_errors.is_empty()
    }

    /// Returns the messages recorded for `key`, or an empty slice.
    pub fn messages_for(&self, key: &str) -> &[String] {
        self.field_errors
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the total number of messages across both groups.
    pub fn len(&self) -> usize {
        self.struct_errors.len() + self.field_errors.values().map(Vec::len).sum::<usize>()
    }

    /// Returns true if no message has been recorded.
    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }

    /// Returns an iterator over `(key, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.field_errors
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }

    /// Renders the errors as a human-readable multi-line report.
    ///
    /// The report lists whole-record messages first, then each key followed
    /// by its messages. Keys appear in the order they were first recorded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use querybind::QueryValidationError;
    ///
    /// let mut errors = QueryValidationError::new();
    /// errors.record_field_error("age", "field is required");
    ///
    /// assert_eq!(
    ///     errors.render(),
    ///     "Parsing query parameters failed.\nStruct Errors:\nField Errors:\n\tage:\n\t\tfield is required\n"
    /// );
    /// ```
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Converts the accumulator into a [`Validation`], succeeding with `value`
    /// only when nothing was recorded.
    pub fn into_validation<T>(self, value: T) -> Validation<T, Self> {
        if self.has_errors() {
            Validation::Failure(self)
        } else {
            Validation::Success(value)
        }
    }
}

impl Display for QueryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Parsing query parameters failed.")?;

        writeln!(f, "Struct Errors:")?;
        for message in &self.struct_errors {
            writeln!(f, "\t{}", message)?;
        }

        writeln!(f, "Field Errors:")?;
        for (key, messages) in &self.field_errors {
            writeln!(f, "\t{}:", key)?;
            for message in messages {
                writeln!(f, "\t\t{}", message)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for QueryValidationError {}

/// Merges two accumulators key by key.
///
/// Messages from `other` are appended after the messages already held for the
/// same key, so per-key ordering is preserved on both sides.
impl Semigroup for QueryValidationError {
    fn combine(mut self, other: Self) -> Self {
        for (key, messages) in other.field_errors {
            self.field_errors.entry(key).or_default().extend(messages);
        }
        self.struct_errors.extend(other.struct_errors);
        self
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<QueryValidationError>();
    assert_sync::<QueryValidationError>();
};
