//! Core domain logic for fundmatch.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::eligibility::{investor_eligible_for, project_eligible_for};
pub use model::investment::{check_investment, CannotInvestReason, Investment};
pub use model::investor::{Investor, InvestorId, InvestorInput};
pub use model::money::{Money, MoneyError};
pub use model::project::{Project, ProjectId, ProjectInput};
pub use model::validation::{UpdateMode, ValidationError};
pub use repo::investment_repo::{
    InvestmentOutcome, InvestmentRepository, SqliteInvestmentRepository,
};
pub use repo::investor_repo::{InvestorListQuery, InvestorRepository, SqliteInvestorRepository};
pub use repo::project_repo::{ProjectListQuery, ProjectRepository, SqliteProjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::eligibility_service::EligibilityService;
pub use service::investment_service::InvestmentService;
pub use service::investor_service::InvestorService;
pub use service::project_service::ProjectService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
