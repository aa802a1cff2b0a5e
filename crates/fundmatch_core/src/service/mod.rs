//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate repository outcomes into one use-case error taxonomy.
//! - Keep the HTTP layer decoupled from storage details.

use crate::model::investment::CannotInvestReason;
use crate::model::investor::{InvestorId, COMMITTED_EXCEEDS_TOTAL};
use crate::model::project::ProjectId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod eligibility_service;
pub mod investment_service;
pub mod investor_service;
pub mod project_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case error shared by all core services.
#[derive(Debug)]
pub enum ServiceError {
    ProjectNotFound(ProjectId),
    InvestorNotFound(InvestorId),
    /// Payload failed field validation.
    Validation(ValidationError),
    /// Update attempted on a funded project.
    EditFundedProject(ProjectId),
    /// Candidate-investor query on a funded project.
    ProjectAlreadyFunded(ProjectId),
    /// One investment precondition failed.
    CannotInvest(CannotInvestReason),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::InvestorNotFound(id) => write!(f, "investor not found: {id}"),
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::EditFundedProject(id) => write!(f, "cannot edit funded project: {id}"),
            Self::ProjectAlreadyFunded(id) => write!(f, "project has been funded: {id}"),
            Self::CannotInvest(reason) => write!(f, "cannot invest: {reason}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::CannotInvest(reason) => Some(reason),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProjectNotFound(id) => Self::ProjectNotFound(id),
            RepoError::InvestorNotFound(id) => Self::InvestorNotFound(id),
            RepoError::ProjectFunded(id) => Self::EditFundedProject(id),
            // The committed amount moved under us; report it on the field.
            RepoError::CommittedExceedsTotal(_) => Self::Validation(ValidationError::single(
                "total_amount",
                COMMITTED_EXCEEDS_TOTAL,
            )),
            other => Self::Repo(other),
        }
    }
}
