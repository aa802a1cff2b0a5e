//! Pure eligibility predicates between investors and projects.
//!
//! Repository list queries encode the same predicates in SQL; these functions
//! are the in-memory reference.

use crate::model::investor::Investor;
use crate::model::project::Project;

/// Whether `investor` may fund `project` right now.
///
/// All bounds are inclusive.
pub fn project_eligible_for(project: &Project, investor: &Investor) -> bool {
    project.amount <= investor.individual_amount
        && project.delivery_date <= investor.project_delivery_deadline
        && !project.funded
        && project.amount <= investor.remaining_amount
}

/// Whether `investor` is a candidate funder for `project`.
///
/// Checks the investor's total rather than the remaining amount, so an
/// investor with capital already committed elsewhere is still listed.
pub fn investor_eligible_for(investor: &Investor, project: &Project) -> bool {
    investor.project_delivery_deadline >= project.delivery_date
        && investor.individual_amount >= project.amount
        && investor.total_amount >= project.amount
}
