//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/get/list APIs over `projects` storage.
//! - Express eligibility filtering as SQL predicates.
//!
//! # Invariants
//! - `funded` is written on insert only; the investment repository flips it.
//! - Updates are refused at the storage layer once a project is funded.

use crate::model::investor::Investor;
use crate::model::money::Money;
use crate::model::project::{Project, ProjectId};
use crate::repo::{
    ensure_connection_ready, ensure_storable_date, parse_bool, parse_money, parse_uuid,
    RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    amount_cents,
    delivery_date,
    funded
FROM projects";

const PROJECT_COLUMNS: &[&str] = &[
    "uuid",
    "amount_cents",
    "delivery_date",
    "funded",
    "created_at",
    "updated_at",
];

/// Filter options for listing projects. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListQuery {
    /// Keep projects with `amount <= max_amount`.
    pub max_amount: Option<Money>,
    /// Keep projects with `delivery_date <= delivered_by`.
    pub delivered_by: Option<NaiveDate>,
    /// Keep projects whose funded flag matches.
    pub funded: Option<bool>,
}

impl ProjectListQuery {
    /// Projects the investor may fund now.
    ///
    /// Mirrors [`crate::model::eligibility::project_eligible_for`].
    pub fn eligible_for(investor: &Investor) -> Self {
        Self {
            max_amount: Some(investor.individual_amount.min(investor.remaining_amount)),
            delivered_by: Some(investor.project_delivery_deadline),
            funded: Some(false),
        }
    }
}

/// Repository interface for project persistence.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Writes `amount` and `delivery_date`. Fails with `ProjectFunded` when
    /// the stored row is funded.
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "projects", PROJECT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        ensure_storable_date(project.delivery_date, "projects.delivery_date")?;
        self.conn.execute(
            "INSERT INTO projects (
                uuid,
                amount_cents,
                delivery_date,
                funded
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                project.id.to_string(),
                project.amount.minor_units(),
                project.delivery_date,
                project.funded,
            ],
        )?;

        Ok(project.id)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        ensure_storable_date(project.delivery_date, "projects.delivery_date")?;
        let changed = self.conn.execute(
            "UPDATE projects
             SET
                amount_cents = ?2,
                delivery_date = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND funded = 0;",
            params![
                project.id.to_string(),
                project.amount.minor_units(),
                project.delivery_date,
            ],
        )?;

        if changed == 0 {
            return match load_project(self.conn, project.id)? {
                Some(_) => Err(RepoError::ProjectFunded(project.id)),
                None => Err(RepoError::ProjectNotFound(project.id)),
            };
        }

        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        load_project(self.conn, id)
    }

    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>> {
        let mut sql = format!("{PROJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(max_amount) = query.max_amount {
            sql.push_str(" AND amount_cents <= ?");
            bind_values.push(Value::Integer(max_amount.minor_units()));
        }

        if let Some(delivered_by) = query.delivered_by {
            sql.push_str(" AND delivery_date <= ?");
            bind_values.push(Value::Text(delivered_by.format("%F").to_string()));
        }

        if let Some(funded) = query.funded {
            sql.push_str(" AND funded = ?");
            bind_values.push(Value::Integer(i64::from(funded)));
        }

        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut projects = Vec::new();

        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }

        Ok(projects)
    }
}

/// Loads one project on any connection or open transaction.
pub(crate) fn load_project(conn: &Connection, id: ProjectId) -> RepoResult<Option<Project>> {
    conn.query_row(
        &format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"),
        [id.to_string()],
        |row| Ok(parse_project_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Project {
        id: parse_uuid(&uuid_text, "projects.uuid")?,
        amount: parse_money(row.get("amount_cents")?, "projects.amount_cents")?,
        delivery_date: row.get("delivery_date")?,
        funded: parse_bool(row.get("funded")?, "projects.funded")?,
    })
}
