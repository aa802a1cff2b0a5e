//! Project use-case service.
//!
//! # Invariants
//! - Funded projects are never edited; the check runs before validation.
//! - Service APIs never bypass repository persistence contracts.

use crate::model::project::{Project, ProjectId, ProjectInput};
use crate::model::validation::UpdateMode;
use crate::repo::project_repo::{ProjectListQuery, ProjectRepository};
use crate::service::{ServiceError, ServiceResult};

/// Use-case service wrapper for project CRUD.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new unfunded project.
    pub fn create_project(&self, input: ProjectInput) -> ServiceResult<Project> {
        let project = input.into_new_project()?;
        self.repo.create_project(&project)?;
        Ok(project)
    }

    /// Gets one project, failing with `ProjectNotFound` when missing.
    pub fn get_project(&self, id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .get_project(id)?
            .ok_or(ServiceError::ProjectNotFound(id))
    }

    pub fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.list_projects(&ProjectListQuery::default())?)
    }

    /// Applies a full or partial update to an unfunded project.
    ///
    /// # Errors
    /// - `ProjectNotFound` when `id` is unknown.
    /// - `EditFundedProject` when the project is funded, whatever the payload.
    /// - `Validation` when the payload is malformed.
    pub fn update_project(
        &self,
        id: ProjectId,
        input: ProjectInput,
        mode: UpdateMode,
    ) -> ServiceResult<Project> {
        let current = self.get_project(id)?;
        if current.funded {
            return Err(ServiceError::EditFundedProject(id));
        }

        let updated = input.apply_to(&current, mode)?;
        self.repo.update_project(&updated)?;
        Ok(updated)
    }
}
