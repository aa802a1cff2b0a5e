//! Request handlers grouped by resource.

pub mod health;
pub mod investors;
pub mod projects;

use crate::error::{ApiError, ApiResult};
use uuid::Uuid;

/// Ids that are not UUIDs cannot name a stored record.
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}
