//! Investor repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/get/list APIs over `investors` storage.
//! - Express candidate-funder filtering as SQL predicates.
//!
//! # Invariants
//! - Updates recompute `remaining_amount` from the stored committed capital,
//!   so an investment landing between read and write is never lost.
//! - `remaining_amount` is only decreased by the investment repository.

use crate::model::investor::{Investor, InvestorId};
use crate::model::money::Money;
use crate::model::project::Project;
use crate::repo::{
    ensure_connection_ready, ensure_storable_date, parse_money, parse_uuid, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const INVESTOR_SELECT_SQL: &str = "SELECT
    uuid,
    total_amount_cents,
    individual_amount_cents,
    remaining_amount_cents,
    project_delivery_deadline
FROM investors";

const INVESTOR_COLUMNS: &[&str] = &[
    "uuid",
    "total_amount_cents",
    "individual_amount_cents",
    "remaining_amount_cents",
    "project_delivery_deadline",
    "created_at",
    "updated_at",
];

/// Filter options for listing investors. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestorListQuery {
    /// Keep investors with `individual_amount >= min_individual_amount`.
    pub min_individual_amount: Option<Money>,
    /// Keep investors with `total_amount >= min_total_amount`.
    pub min_total_amount: Option<Money>,
    /// Keep investors with `project_delivery_deadline >= deadline_not_before`.
    pub deadline_not_before: Option<NaiveDate>,
}

impl InvestorListQuery {
    /// Investors that could fund the project.
    ///
    /// Mirrors [`crate::model::eligibility::investor_eligible_for`].
    pub fn eligible_for(project: &Project) -> Self {
        Self {
            min_individual_amount: Some(project.amount),
            min_total_amount: Some(project.amount),
            deadline_not_before: Some(project.delivery_date),
        }
    }
}

/// Repository interface for investor persistence.
pub trait InvestorRepository {
    fn create_investor(&self, investor: &Investor) -> RepoResult<InvestorId>;
    /// Writes total, individual amount and deadline.
    ///
    /// The stored remaining amount becomes `total - committed`, where
    /// `committed` is read from the row at write time. Fails with
    /// `CommittedExceedsTotal` when that would go negative.
    fn update_investor(&self, investor: &Investor) -> RepoResult<()>;
    fn get_investor(&self, id: InvestorId) -> RepoResult<Option<Investor>>;
    fn list_investors(&self, query: &InvestorListQuery) -> RepoResult<Vec<Investor>>;
}

/// SQLite-backed investor repository.
pub struct SqliteInvestorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInvestorRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "investors", INVESTOR_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl InvestorRepository for SqliteInvestorRepository<'_> {
    fn create_investor(&self, investor: &Investor) -> RepoResult<InvestorId> {
        ensure_storable_date(
            investor.project_delivery_deadline,
            "investors.project_delivery_deadline",
        )?;
        self.conn.execute(
            "INSERT INTO investors (
                uuid,
                total_amount_cents,
                individual_amount_cents,
                remaining_amount_cents,
                project_delivery_deadline
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                investor.id.to_string(),
                investor.total_amount.minor_units(),
                investor.individual_amount.minor_units(),
                investor.remaining_amount.minor_units(),
                investor.project_delivery_deadline,
            ],
        )?;

        Ok(investor.id)
    }

    fn update_investor(&self, investor: &Investor) -> RepoResult<()> {
        ensure_storable_date(
            investor.project_delivery_deadline,
            "investors.project_delivery_deadline",
        )?;
        // Right-hand side columns read the pre-update row.
        let changed = self.conn.execute(
            "UPDATE investors
             SET
                total_amount_cents = ?2,
                individual_amount_cents = ?3,
                project_delivery_deadline = ?4,
                remaining_amount_cents = ?2 - (total_amount_cents - remaining_amount_cents),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND total_amount_cents - remaining_amount_cents <= ?2;",
            params![
                investor.id.to_string(),
                investor.total_amount.minor_units(),
                investor.individual_amount.minor_units(),
                investor.project_delivery_deadline,
            ],
        )?;

        if changed == 0 {
            return match load_investor(self.conn, investor.id)? {
                Some(_) => Err(RepoError::CommittedExceedsTotal(investor.id)),
                None => Err(RepoError::InvestorNotFound(investor.id)),
            };
        }

        Ok(())
    }

    fn get_investor(&self, id: InvestorId) -> RepoResult<Option<Investor>> {
        load_investor(self.conn, id)
    }

    fn list_investors(&self, query: &InvestorListQuery) -> RepoResult<Vec<Investor>> {
        let mut sql = format!("{INVESTOR_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(min_individual) = query.min_individual_amount {
            sql.push_str(" AND individual_amount_cents >= ?");
            bind_values.push(Value::Integer(min_individual.minor_units()));
        }

        if let Some(min_total) = query.min_total_amount {
            sql.push_str(" AND total_amount_cents >= ?");
            bind_values.push(Value::Integer(min_total.minor_units()));
        }

        if let Some(not_before) = query.deadline_not_before {
            sql.push_str(" AND project_delivery_deadline >= ?");
            bind_values.push(Value::Text(not_before.format("%F").to_string()));
        }

        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut investors = Vec::new();

        while let Some(row) = rows.next()? {
            investors.push(parse_investor_row(row)?);
        }

        Ok(investors)
    }
}

/// Loads one investor on any connection or open transaction.
pub(crate) fn load_investor(conn: &Connection, id: InvestorId) -> RepoResult<Option<Investor>> {
    conn.query_row(
        &format!("{INVESTOR_SELECT_SQL} WHERE uuid = ?1;"),
        [id.to_string()],
        |row| Ok(parse_investor_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_investor_row(row: &Row<'_>) -> RepoResult<Investor> {
    let uuid_text: String = row.get("uuid")?;
    let investor = Investor {
        id: parse_uuid(&uuid_text, "investors.uuid")?,
        total_amount: parse_money(row.get("total_amount_cents")?, "investors.total_amount_cents")?,
        individual_amount: parse_money(
            row.get("individual_amount_cents")?,
            "investors.individual_amount_cents",
        )?,
        remaining_amount: parse_money(
            row.get("remaining_amount_cents")?,
            "investors.remaining_amount_cents",
        )?,
        project_delivery_deadline: row.get("project_delivery_deadline")?,
    };

    if investor.remaining_amount > investor.total_amount {
        return Err(RepoError::InvalidData(format!(
            "remaining amount exceeds total for investor {}",
            investor.id
        )));
    }

    Ok(investor)
}
