//! Investment use-case service.
//!
//! # Responsibility
//! - Run one investor→project allocation and report its outcome.
//! - Emit `invest` logging events with duration and status.

use crate::model::investment::Investment;
use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use crate::repo::investment_repo::{InvestmentOutcome, InvestmentRepository};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::time::Instant;

/// Executes investments through an [`InvestmentRepository`].
pub struct InvestmentService<R: InvestmentRepository> {
    repo: R,
}

impl<R: InvestmentRepository> InvestmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Commits `investor_id`'s capital to `project_id`.
    ///
    /// On failure nothing is mutated.
    ///
    /// # Errors
    /// - `InvestorNotFound` / `ProjectNotFound` for unknown ids.
    /// - `CannotInvest` with the first violated precondition.
    pub fn invest(
        &self,
        investor_id: InvestorId,
        project_id: ProjectId,
    ) -> ServiceResult<Investment> {
        let started_at = Instant::now();
        let outcome = self.repo.invest(investor_id, project_id);
        let elapsed_ms = started_at.elapsed().as_millis();

        match outcome {
            Ok(InvestmentOutcome::Committed(investment)) => {
                info!(
                    "event=invest module=service status=ok investor={} project={} amount={} remaining={} duration_ms={}",
                    investor_id,
                    project_id,
                    investment.project.amount,
                    investment.investor.remaining_amount,
                    elapsed_ms
                );
                Ok(investment)
            }
            Ok(InvestmentOutcome::Rejected(reason)) => {
                info!(
                    "event=invest module=service status=rejected investor={} project={} reason={:?} duration_ms={}",
                    investor_id, project_id, reason, elapsed_ms
                );
                Err(ServiceError::CannotInvest(reason))
            }
            Err(err) => {
                warn!(
                    "event=invest module=service status=error investor={} project={} duration_ms={} error={}",
                    investor_id, project_id, elapsed_ms, err
                );
                Err(err.into())
            }
        }
    }
}
