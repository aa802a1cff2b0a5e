//! Field-level validation errors for create/update payloads.
//!
//! # Invariants
//! - An error value always carries at least one field message.
//! - Field order is deterministic (sorted by field name).

use crate::model::money::Money;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const REQUIRED_FIELD_MESSAGE: &str = "This field is required.";
pub(crate) const DATE_OUT_OF_RANGE_MESSAGE: &str = "Ensure the year is between 0000 and 9999.";

/// Dates stored as `YYYY-MM-DD` text only order correctly inside this range.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Whether an update replaces every field or only the supplied ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Every writable field must be present (`PUT`).
    Full,
    /// Missing fields keep their current value (`PATCH`).
    Partial,
}

/// Per-field validation messages, serialized as `{"field": ["message"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Creates an error with a single field message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.add(field, message);
        error
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Returns messages recorded for one field.
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Resolves one input field against its current value.
///
/// `current` is `None` for creates and full updates, so a missing input is
/// recorded as required and `None` is returned.
pub(crate) fn resolve_field<T: Copy>(
    errors: &mut ValidationError,
    field: &str,
    input: Option<T>,
    current: Option<T>,
) -> Option<T> {
    match (input, current) {
        (Some(value), _) => Some(value),
        (None, Some(existing)) => Some(existing),
        (None, None) => {
            errors.add(field, REQUIRED_FIELD_MESSAGE);
            None
        }
    }
}

/// Whether `date` keeps text ordering equal to date ordering in storage.
pub(crate) fn is_storable_date(date: NaiveDate) -> bool {
    STORABLE_YEARS.contains(&date.year())
}

/// Like [`resolve_field`] but rejects dates outside the storable year range.
pub(crate) fn resolve_date(
    errors: &mut ValidationError,
    field: &str,
    input: Option<NaiveDate>,
    current: Option<NaiveDate>,
) -> Option<NaiveDate> {
    match input {
        Some(date) if !is_storable_date(date) => {
            errors.add(field, DATE_OUT_OF_RANGE_MESSAGE);
            None
        }
        _ => resolve_field(errors, field, input, current),
    }
}

/// Like [`resolve_field`] but converts wire decimals into [`Money`].
pub(crate) fn resolve_money(
    errors: &mut ValidationError,
    field: &str,
    input: Option<Decimal>,
    current: Option<Money>,
) -> Option<Money> {
    match input {
        Some(value) => match Money::try_from(value) {
            Ok(money) => Some(money),
            Err(err) => {
                errors.add(field, err.to_string());
                None
            }
        },
        None => resolve_field(errors, field, None, current),
    }
}
