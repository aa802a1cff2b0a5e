//! Investor domain model.
//!
//! # Responsibility
//! - Define the capital source record and its create/update payload.
//! - Keep committed capital fixed when the total is edited.
//!
//! # Invariants
//! - `0 <= remaining_amount <= total_amount`.
//! - `remaining_amount` starts equal to `total_amount`.
//! - `total_amount - remaining_amount` only grows through investments.

use crate::model::money::Money;
use crate::model::validation::{resolve_date, resolve_money, UpdateMode, ValidationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an investor.
pub type InvestorId = Uuid;

/// Capital source with per-project and delivery-date limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investor {
    pub id: InvestorId,
    /// Capital available across all investments.
    pub total_amount: Money,
    /// Largest amount committable to a single project.
    pub individual_amount: Money,
    /// Capital not yet committed.
    pub remaining_amount: Money,
    /// Latest acceptable project delivery date.
    pub project_delivery_deadline: NaiveDate,
}

impl Investor {
    /// Creates an investor with a generated stable ID and nothing committed.
    pub fn new(
        total_amount: Money,
        individual_amount: Money,
        project_delivery_deadline: NaiveDate,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            total_amount,
            individual_amount,
            project_delivery_deadline,
        )
    }

    pub fn with_id(
        id: InvestorId,
        total_amount: Money,
        individual_amount: Money,
        project_delivery_deadline: NaiveDate,
    ) -> Self {
        Self {
            id,
            total_amount,
            individual_amount,
            remaining_amount: total_amount,
            project_delivery_deadline,
        }
    }

    /// Capital already allocated to funded projects.
    pub fn committed_amount(&self) -> Money {
        self.total_amount
            .checked_sub(self.remaining_amount)
            .unwrap_or(Money::ZERO)
    }
}

/// Writable investor fields as received from callers.
///
/// `remaining_amount` and `id` are derived and never read from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvestorInput {
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub individual_amount: Option<Decimal>,
    #[serde(default)]
    pub project_delivery_deadline: Option<NaiveDate>,
}

impl InvestorInput {
    /// Validates a create payload into a new investor.
    pub fn into_new_investor(self) -> Result<Investor, ValidationError> {
        let mut errors = ValidationError::default();
        let total_amount = resolve_money(&mut errors, "total_amount", self.total_amount, None);
        let individual_amount =
            resolve_money(&mut errors, "individual_amount", self.individual_amount, None);
        let deadline = resolve_date(
            &mut errors,
            "project_delivery_deadline",
            self.project_delivery_deadline,
            None,
        );

        match (total_amount, individual_amount, deadline) {
            (Some(total), Some(individual), Some(deadline)) if errors.is_empty() => {
                Ok(Investor::new(total, individual, deadline))
            }
            _ => Err(errors),
        }
    }

    /// Validates an update payload against `current`.
    ///
    /// A new total below the committed capital is rejected; otherwise the
    /// remaining amount is recomputed as `new_total - committed`.
    pub fn apply_to(
        self,
        current: &Investor,
        mode: UpdateMode,
    ) -> Result<Investor, ValidationError> {
        let (current_total, current_individual, current_deadline) = match mode {
            UpdateMode::Full => (None, None, None),
            UpdateMode::Partial => (
                Some(current.total_amount),
                Some(current.individual_amount),
                Some(current.project_delivery_deadline),
            ),
        };

        let mut errors = ValidationError::default();
        let total_amount =
            resolve_money(&mut errors, "total_amount", self.total_amount, current_total);
        let individual_amount = resolve_money(
            &mut errors,
            "individual_amount",
            self.individual_amount,
            current_individual,
        );
        let deadline = resolve_date(
            &mut errors,
            "project_delivery_deadline",
            self.project_delivery_deadline,
            current_deadline,
        );

        let committed = current.committed_amount();
        let remaining_amount = total_amount.and_then(|total| {
            let remaining = total.checked_sub(committed);
            if remaining.is_none() {
                errors.add("total_amount", COMMITTED_EXCEEDS_TOTAL);
            }
            remaining
        });

        match (total_amount, individual_amount, deadline, remaining_amount) {
            (Some(total), Some(individual), Some(deadline), Some(remaining))
                if errors.is_empty() =>
            {
                Ok(Investor {
                    id: current.id,
                    total_amount: total,
                    individual_amount: individual,
                    remaining_amount: remaining,
                    project_delivery_deadline: deadline,
                })
            }
            _ => Err(errors),
        }
    }
}

pub(crate) const COMMITTED_EXCEEDS_TOTAL: &str =
    "Ensure this value is greater than or equal to the committed amount.";
