//! Project domain model.
//!
//! # Responsibility
//! - Define the funding target record and its create/update payload.
//!
//! # Invariants
//! - `id` is stable and never reused for another project.
//! - `funded` only flips from `false` to `true`, through an investment.
//! - A funded project's `amount` and `delivery_date` never change.

use crate::model::money::Money;
use crate::model::validation::{resolve_date, resolve_money, UpdateMode, ValidationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Funding target awaiting a single investor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Capital required to close the project.
    pub amount: Money,
    /// Date by which the project delivers.
    pub delivery_date: NaiveDate,
    /// Set once by a successful investment.
    pub funded: bool,
}

impl Project {
    /// Creates an unfunded project with a generated stable ID.
    pub fn new(amount: Money, delivery_date: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4(), amount, delivery_date)
    }

    pub fn with_id(id: ProjectId, amount: Money, delivery_date: NaiveDate) -> Self {
        Self {
            id,
            amount,
            delivery_date,
            funded: false,
        }
    }
}

/// Writable project fields as received from callers.
///
/// `funded` and `id` are not part of the payload; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectInput {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

impl ProjectInput {
    /// Validates a create payload into a new unfunded project.
    pub fn into_new_project(self) -> Result<Project, ValidationError> {
        let mut errors = ValidationError::default();
        let amount = resolve_money(&mut errors, "amount", self.amount, None);
        let delivery_date = resolve_date(&mut errors, "delivery_date", self.delivery_date, None);

        match (amount, delivery_date) {
            (Some(amount), Some(delivery_date)) if errors.is_empty() => {
                Ok(Project::new(amount, delivery_date))
            }
            _ => Err(errors),
        }
    }

    /// Validates an update payload against `current` and returns the result.
    ///
    /// Funded-state checks are the caller's concern; this only validates
    /// field shape.
    pub fn apply_to(self, current: &Project, mode: UpdateMode) -> Result<Project, ValidationError> {
        let (current_amount, current_date) = match mode {
            UpdateMode::Full => (None, None),
            UpdateMode::Partial => (Some(current.amount), Some(current.delivery_date)),
        };

        let mut errors = ValidationError::default();
        let amount = resolve_money(&mut errors, "amount", self.amount, current_amount);
        let delivery_date =
            resolve_date(&mut errors, "delivery_date", self.delivery_date, current_date);

        match (amount, delivery_date) {
            (Some(amount), Some(delivery_date)) if errors.is_empty() => Ok(Project {
                amount,
                delivery_date,
                ..current.clone()
            }),
            _ => Err(errors),
        }
    }
}
