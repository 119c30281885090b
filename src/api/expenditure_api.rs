//! Expenditure endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use super::fetch;
use crate::domain::{required, required_amount, Expenditure, ExpenditureStatus};
use crate::repository::{Repository, ScopedRepository};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureQuery {
    pub organization_id: Option<String>,
    pub status: Option<ExpenditureStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenditure {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub requested_by: Option<String>,
    pub organization_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Only draft or pending are accepted at creation
    pub status: Option<ExpenditureStatus>,
}

pub async fn list_expenditures(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ExpenditureQuery>,
) -> ApiResult<Json<Vec<Expenditure>>> {
    let expenditures = match query.organization_id.as_deref() {
        Some(org) => state.store.expenditures.list_by_organization(org).await?,
        None => state.store.expenditures.list().await?,
    };
    let expenditures = match query.status {
        Some(status) => expenditures.into_iter().filter(|e| e.status == status).collect(),
        None => expenditures,
    };
    Ok(Json(expenditures))
}

pub async fn create_expenditure(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateExpenditure>,
) -> ApiResult<(StatusCode, Json<Expenditure>)> {
    let title = required(&payload.title, "title")?;
    let amount = required_amount(payload.amount, "amount")?;
    let kind = required(&payload.kind, "type")?;
    let requested_by = required(&payload.requested_by, "requestedBy")?;
    let organization_id = required(&payload.organization_id, "organizationId")?;

    let status = payload.status.unwrap_or_default();
    if !status.is_open() {
        return Err(ApiError::invalid(format!(
            "new expenditures must be draft or pending, not {}",
            status.as_str()
        )));
    }

    let mut exp = Expenditure::new(
        state.store.next_id::<Expenditure>(),
        title.to_string(),
        amount,
        kind.to_string(),
        requested_by.to_string(),
        organization_id.to_string(),
    );
    exp.description = payload.description.clone();
    exp.category = payload.category.clone();
    exp.due_date = payload.due_date;
    exp.status = status;

    let created = state.store.expenditures.create(&exp).await?;
    state
        .store
        .record_audit(
            "expenditure.create",
            "expenditure",
            &created.id,
            Some(created.requested_by.clone()),
            Some(json!({ "amount": created.amount, "type": created.kind })),
        )
        .await?;
    log::info!("expenditure {} requested for {}", created.id, created.amount);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_expenditure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Expenditure>> {
    fetch(&state.store.expenditures, &id).await
}

/// Shallow merge; status may be set directly here (e.g. to `disbursed`).
pub async fn update_expenditure(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<Expenditure>> {
    let updated = state.store.expenditures.merge(&id, patch).await?;
    Ok(Json(updated))
}

pub async fn delete_expenditure(Path(_id): Path<String>) -> ApiResult<Json<Value>> {
    Err(ApiError::not_implemented("deleting expenditures"))
}
