//! Investment persistence: the single write that closes a project.
//!
//! # Responsibility
//! - Apply the investment rule and both mutations in one transaction.
//!
//! # Invariants
//! - Runs under `BEGIN IMMEDIATE`; the write lock is held from first read.
//! - `projects.funded` is flipped with `WHERE funded = 0` (compare-and-set).
//! - `investors.remaining_amount_cents` is debited with a `>= amount` guard.
//! - Either both rows change or neither does.

use crate::model::investment::{check_investment, CannotInvestReason, Investment};
use crate::model::investor::InvestorId;
use crate::model::project::ProjectId;
use crate::repo::investor_repo::load_investor;
use crate::repo::project_repo::load_project;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// Outcome of an investment attempt against existing records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvestmentOutcome {
    Committed(Investment),
    Rejected(CannotInvestReason),
}

/// Repository interface for the investment write.
pub trait InvestmentRepository {
    /// Attempts to fund `project_id` from `investor_id`.
    ///
    /// Missing records surface as `InvestorNotFound`/`ProjectNotFound`;
    /// rule violations as `Ok(InvestmentOutcome::Rejected(_))`.
    fn invest(
        &self,
        investor_id: InvestorId,
        project_id: ProjectId,
    ) -> RepoResult<InvestmentOutcome>;
}

/// SQLite-backed investment repository.
pub struct SqliteInvestmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInvestmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "projects", &["uuid", "amount_cents", "funded"])?;
        ensure_connection_ready(conn, "investors", &["uuid", "remaining_amount_cents"])?;
        Ok(Self { conn })
    }
}

impl InvestmentRepository for SqliteInvestmentRepository<'_> {
    fn invest(
        &self,
        investor_id: InvestorId,
        project_id: ProjectId,
    ) -> RepoResult<InvestmentOutcome> {
        // Dropping `tx` without commit rolls back.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let investor =
            load_investor(&tx, investor_id)?.ok_or(RepoError::InvestorNotFound(investor_id))?;
        let project =
            load_project(&tx, project_id)?.ok_or(RepoError::ProjectNotFound(project_id))?;

        if let Err(reason) = check_investment(&investor, &project) {
            return Ok(InvestmentOutcome::Rejected(reason));
        }

        let funded = tx.execute(
            "UPDATE projects
             SET
                funded = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND funded = 0;",
            [project_id.to_string()],
        )?;
        if funded == 0 {
            return Ok(InvestmentOutcome::Rejected(
                CannotInvestReason::ProjectAlreadyFunded,
            ));
        }

        let debited = tx.execute(
            "UPDATE investors
             SET
                remaining_amount_cents = remaining_amount_cents - ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND remaining_amount_cents >= ?2;",
            params![investor_id.to_string(), project.amount.minor_units()],
        )?;
        if debited == 0 {
            return Ok(InvestmentOutcome::Rejected(
                CannotInvestReason::ExceedsRemainingAmount,
            ));
        }

        let investor = load_investor(&tx, investor_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("investor {investor_id} vanished during investment"))
        })?;
        let project = load_project(&tx, project_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("project {project_id} vanished during investment"))
        })?;
        tx.commit()?;

        Ok(InvestmentOutcome::Committed(Investment { investor, project }))
    }
}
