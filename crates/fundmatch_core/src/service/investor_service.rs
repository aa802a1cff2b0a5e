//! Investor use-case service.

use crate::model::investor::{Investor, InvestorId, InvestorInput};
use crate::model::validation::UpdateMode;
use crate::repo::investor_repo::{InvestorListQuery, InvestorRepository};
use crate::service::{ServiceError, ServiceResult};

/// Use-case service wrapper for investor CRUD.
pub struct InvestorService<R: InvestorRepository> {
    repo: R,
}

impl<R: InvestorRepository> InvestorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new investor with nothing committed.
    pub fn create_investor(&self, input: InvestorInput) -> ServiceResult<Investor> {
        let investor = input.into_new_investor()?;
        self.repo.create_investor(&investor)?;
        Ok(investor)
    }

    /// Gets one investor, failing with `InvestorNotFound` when missing.
    pub fn get_investor(&self, id: InvestorId) -> ServiceResult<Investor> {
        self.repo
            .get_investor(id)?
            .ok_or(ServiceError::InvestorNotFound(id))
    }

    pub fn list_investors(&self) -> ServiceResult<Vec<Investor>> {
        Ok(self.repo.list_investors(&InvestorListQuery::default())?)
    }

    /// Applies a full or partial update and returns the stored record.
    ///
    /// The stored record is read back because the repository recomputes
    /// `remaining_amount` at write time.
    pub fn update_investor(
        &self,
        id: InvestorId,
        input: InvestorInput,
        mode: UpdateMode,
    ) -> ServiceResult<Investor> {
        let current = self.get_investor(id)?;
        let updated = input.apply_to(&current, mode)?;
        self.repo.update_investor(&updated)?;
        self.get_investor(id)
    }
}
