//! `/investors` handlers, including the invest action.

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fundmatch_core::{
    EligibilityService, InvestmentService, Investor, InvestorInput, InvestorService, Money,
    Project, SqliteInvestmentRepository, SqliteInvestorRepository, SqliteProjectRepository,
    UpdateMode,
};
use serde::Serialize;

/// Body of a successful investment.
#[derive(Debug, Serialize)]
pub struct InvestResponse {
    pub funded_project: Project,
    pub remaining_amount: Money,
}

pub async fn list_investors(State(state): State<AppState>) -> ApiResult<Json<Vec<Investor>>> {
    let investors = state
        .db
        .call(|conn| {
            let service = InvestorService::new(SqliteInvestorRepository::try_new(conn)?);
            Ok(service.list_investors()?)
        })
        .await?;
    Ok(Json(investors))
}

pub async fn create_investor(
    State(state): State<AppState>,
    payload: Result<Json<InvestorInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Investor>)> {
    let Json(input) = payload?;
    let investor = state
        .db
        .call(move |conn| {
            let service = InvestorService::new(SqliteInvestorRepository::try_new(conn)?);
            Ok(service.create_investor(input)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(investor)))
}

pub async fn get_investor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Investor>> {
    let id = parse_id(&id)?;
    let investor = state
        .db
        .call(move |conn| {
            let service = InvestorService::new(SqliteInvestorRepository::try_new(conn)?);
            Ok(service.get_investor(id)?)
        })
        .await?;
    Ok(Json(investor))
}

pub async fn patch_investor(
    state: State<AppState>,
    id: Path<String>,
    payload: Result<Json<InvestorInput>, JsonRejection>,
) -> ApiResult<Json<Investor>> {
    update_investor(state, id, payload, UpdateMode::Partial).await
}

pub async fn put_investor(
    state: State<AppState>,
    id: Path<String>,
    payload: Result<Json<InvestorInput>, JsonRejection>,
) -> ApiResult<Json<Investor>> {
    update_investor(state, id, payload, UpdateMode::Full).await
}

async fn update_investor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<InvestorInput>, JsonRejection>,
    mode: UpdateMode,
) -> ApiResult<Json<Investor>> {
    let id = parse_id(&id)?;
    let input = payload.map(|Json(input)| input).map_err(ApiError::from);
    let investor = state
        .db
        .call(move |conn| {
            let service = InvestorService::new(SqliteInvestorRepository::try_new(conn)?);
            // Unknown investors are reported before a bad body.
            service.get_investor(id)?;
            Ok(service.update_investor(id, input?, mode)?)
        })
        .await?;
    Ok(Json(investor))
}

pub async fn projects_for_investor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Project>>> {
    let id = parse_id(&id)?;
    let projects = state
        .db
        .call(move |conn| {
            let service = EligibilityService::new(
                SqliteProjectRepository::try_new(conn)?,
                SqliteInvestorRepository::try_new(conn)?,
            );
            Ok(service.projects_for_investor(id)?)
        })
        .await?;
    Ok(Json(projects))
}

pub async fn invest(
    State(state): State<AppState>,
    Path((investor_id, project_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<InvestResponse>)> {
    let investor_id = parse_id(&investor_id)?;
    let project_id = parse_id(&project_id)?;
    let investment = state
        .db
        .call(move |conn| {
            let service = InvestmentService::new(SqliteInvestmentRepository::try_new(conn)?);
            Ok(service.invest(investor_id, project_id)?)
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InvestResponse {
            remaining_amount: investment.investor.remaining_amount,
            funded_project: investment.project,
        }),
    ))
}
