//! `/projects` handlers.

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fundmatch_core::{
    EligibilityService, Investor, Project, ProjectInput, ProjectService, SqliteInvestorRepository,
    SqliteProjectRepository, UpdateMode,
};

pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    let projects = state
        .db
        .call(|conn| {
            let service = ProjectService::new(SqliteProjectRepository::try_new(conn)?);
            Ok(service.list_projects()?)
        })
        .await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let Json(input) = payload?;
    let project = state
        .db
        .call(move |conn| {
            let service = ProjectService::new(SqliteProjectRepository::try_new(conn)?);
            Ok(service.create_project(input)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let id = parse_id(&id)?;
    let project = state
        .db
        .call(move |conn| {
            let service = ProjectService::new(SqliteProjectRepository::try_new(conn)?);
            Ok(service.get_project(id)?)
        })
        .await?;
    Ok(Json(project))
}

pub async fn patch_project(
    state: State<AppState>,
    id: Path<String>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    update_project(state, id, payload, UpdateMode::Partial).await
}

pub async fn put_project(
    state: State<AppState>,
    id: Path<String>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    update_project(state, id, payload, UpdateMode::Full).await
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
    mode: UpdateMode,
) -> ApiResult<Json<Project>> {
    let id = parse_id(&id)?;
    let input = payload.map(|Json(input)| input).map_err(ApiError::from);
    let project = state
        .db
        .call(move |conn| {
            let service = ProjectService::new(SqliteProjectRepository::try_new(conn)?);
            // Unknown and funded projects are reported before a bad body.
            if service.get_project(id)?.funded {
                return Err(ApiError::EditFundedProject);
            }
            Ok(service.update_project(id, input?, mode)?)
        })
        .await?;
    Ok(Json(project))
}

pub async fn investors_for_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Investor>>> {
    let id = parse_id(&id)?;
    let investors = state
        .db
        .call(move |conn| {
            let service = EligibilityService::new(
                SqliteProjectRepository::try_new(conn)?,
                SqliteInvestorRepository::try_new(conn)?,
            );
            Ok(service.investors_for_project(id)?)
        })
        .await?;
    Ok(Json(investors))
}
