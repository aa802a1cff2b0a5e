//! Domain model for projects, investors and the investment rule.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and HTTP.
//! - Own field validation and the pure investment/eligibility rules.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Money is exact: integer minor units, never floating point.
//! - `0 <= investor.remaining_amount <= investor.total_amount`.

pub mod eligibility;
pub mod investment;
pub mod investor;
pub mod money;
pub mod project;
pub mod validation;
