use crate::dtos::{CreateSoldierRequest, SoldierResponse};
use crate::models::Soldier;
use crate::services::metrics::{record_soldier_created, record_soldiers_deleted};
use crate::services::store::{already_exists, not_found};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

/// Static segment routed to [`create_random_soldier`]; it shadows a soldier
/// literally named "random" on `/soldiers/:name`.
pub const RANDOM_SEGMENT: &str = "random";

#[tracing::instrument(skip(state))]
pub async fn list_soldiers(
    State(state): State<AppState>,
) -> Result<Json<Vec<SoldierResponse>>, AppError> {
    let soldiers = state.store.find_all().await?;

    tracing::debug!(count = soldiers.len(), "Listed soldiers");

    Ok(Json(
        soldiers.into_iter().map(SoldierResponse::from).collect(),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_soldier(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SoldierResponse>, AppError> {
    let soldier = state
        .store
        .find_by_name(&name)
        .await?
        .ok_or_else(|| not_found(&name))?;

    Ok(Json(SoldierResponse::from(soldier)))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_soldier(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateSoldierRequest>,
) -> Result<(StatusCode, Json<SoldierResponse>), AppError> {
    // Not atomic with the insert; the Mongo unique index catches the race
    if state.store.find_by_name(&request.name).await?.is_some() {
        return Err(already_exists(&request.name));
    }

    let soldier = state.store.save(Soldier::from(request)).await?;

    record_soldier_created("request");
    tracing::info!(soldier_id = %soldier.id, name = %soldier.name, "Soldier created");

    Ok((StatusCode::CREATED, Json(SoldierResponse::from(soldier))))
}

#[tracing::instrument(skip(state))]
pub async fn create_random_soldier(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SoldierResponse>), AppError> {
    let soldier = state.store.save(Soldier::recruit()).await?;

    record_soldier_created("random");
    tracing::info!(soldier_id = %soldier.id, "Recruit created");

    Ok((StatusCode::CREATED, Json(SoldierResponse::from(soldier))))
}

#[tracing::instrument(skip(state))]
pub async fn delete_soldier(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let soldier = state
        .store
        .find_by_name(&name)
        .await?
        .ok_or_else(|| not_found(&name))?;

    state.store.delete(&soldier).await?;

    record_soldiers_deleted(1);
    tracing::info!(soldier_id = %soldier.id, "Soldier deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub async fn delete_all_soldiers(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let soldiers = state.store.find_all().await?;

    for soldier in &soldiers {
        state.store.delete(soldier).await?;
    }

    record_soldiers_deleted(soldiers.len() as u64);
    tracing::info!(count = soldiers.len(), "All soldiers deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_soldier_named_random(
    state: State<AppState>,
) -> Result<Json<SoldierResponse>, AppError> {
    get_soldier(state, Path(RANDOM_SEGMENT.to_string())).await
}

pub async fn delete_soldier_named_random(state: State<AppState>) -> Result<StatusCode, AppError> {
    delete_soldier(state, Path(RANDOM_SEGMENT.to_string())).await
}
