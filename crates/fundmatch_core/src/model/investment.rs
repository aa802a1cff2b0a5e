//! Investment rule: may this investor close this project?
//!
//! # Invariants
//! - Preconditions are checked in a fixed order and the first failure wins.
//! - The check never mutates its inputs.

use crate::model::investor::Investor;
use crate::model::project::Project;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why an investment was refused, in precondition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannotInvestReason {
    ProjectAlreadyFunded,
    ExceedsRemainingAmount,
    ExceedsIndividualAmount,
    DeliveryAfterDeadline,
}

impl Display for CannotInvestReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectAlreadyFunded => write!(f, "Project has already been funded."),
            Self::ExceedsRemainingAmount => {
                write!(f, "Project amount exceeds investor's remaining amount.")
            }
            Self::ExceedsIndividualAmount => {
                write!(f, "Project amount exceeds investor's individual amount.")
            }
            Self::DeliveryAfterDeadline => {
                write!(f, "Project delivery date is later than investor's deadline.")
            }
        }
    }
}

impl Error for CannotInvestReason {}

/// Result of a committed investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Investment {
    pub investor: Investor,
    pub project: Project,
}

/// Checks every investment precondition without touching storage.
pub fn check_investment(investor: &Investor, project: &Project) -> Result<(), CannotInvestReason> {
    if project.funded {
        return Err(CannotInvestReason::ProjectAlreadyFunded);
    }
    if project.amount > investor.remaining_amount {
        return Err(CannotInvestReason::ExceedsRemainingAmount);
    }
    if project.amount > investor.individual_amount {
        return Err(CannotInvestReason::ExceedsIndividualAmount);
    }
    if project.delivery_date > investor.project_delivery_deadline {
        return Err(CannotInvestReason::DeliveryAfterDeadline);
    }
    Ok(())
}
