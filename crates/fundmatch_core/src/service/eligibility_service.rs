//! Eligibility queries between investors and projects.
//!
//! # Invariants
//! - Read-only: no query here mutates storage.
//! - Candidate investors are never listed for a funded project.

use crate::model::investor::{Investor, InvestorId};
use crate::model::project::{Project, ProjectId};
use crate::repo::investor_repo::{InvestorListQuery, InvestorRepository};
use crate::repo::project_repo::{ProjectListQuery, ProjectRepository};
use crate::service::{ServiceError, ServiceResult};

/// Matches projects and investors by capacity and deadline.
pub struct EligibilityService<P: ProjectRepository, I: InvestorRepository> {
    projects: P,
    investors: I,
}

impl<P: ProjectRepository, I: InvestorRepository> EligibilityService<P, I> {
    pub fn new(projects: P, investors: I) -> Self {
        Self {
            projects,
            investors,
        }
    }

    /// Unfunded projects the investor can fund with current capital.
    pub fn projects_for_investor(&self, investor_id: InvestorId) -> ServiceResult<Vec<Project>> {
        let investor = self
            .investors
            .get_investor(investor_id)?
            .ok_or(ServiceError::InvestorNotFound(investor_id))?;
        Ok(self
            .projects
            .list_projects(&ProjectListQuery::eligible_for(&investor))?)
    }

    /// Investors whose limits admit the project.
    ///
    /// # Errors
    /// - `ProjectAlreadyFunded` when the project is closed.
    pub fn investors_for_project(&self, project_id: ProjectId) -> ServiceResult<Vec<Investor>> {
        let project = self
            .projects
            .get_project(project_id)?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;
        if project.funded {
            return Err(ServiceError::ProjectAlreadyFunded(project_id));
        }
        Ok(self
            .investors
            .list_investors(&InvestorListQuery::eligible_for(&project))?)
    }
}
