//! Income endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use super::fetch;
use crate::domain::{required, required_amount, Income, IncomeStatus};
use crate::repository::{Repository, ScopedRepository};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeQuery {
    pub organization_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncome {
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<IncomeStatus>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub organization_id: Option<String>,
    pub recorded_by: Option<String>,
}

pub async fn list_incomes(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<IncomeQuery>,
) -> ApiResult<Json<Vec<Income>>> {
    let incomes = match query.organization_id.as_deref() {
        Some(org) => state.store.incomes.list_by_organization(org).await?,
        None => state.store.incomes.list().await?,
    };
    let incomes = match query.kind {
        Some(kind) => incomes.into_iter().filter(|i| i.kind == kind).collect(),
        None => incomes,
    };
    Ok(Json(incomes))
}

pub async fn create_income(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateIncome>,
) -> ApiResult<(StatusCode, Json<Income>)> {
    let amount = required_amount(payload.amount, "amount")?;
    let kind = required(&payload.kind, "type")?.to_string();

    let mut income = Income::new(
        state.store.next_id::<Income>(),
        amount,
        kind,
        payload.date.unwrap_or_else(|| Utc::now().date_naive()),
    );
    income.status = payload.status.unwrap_or_default();
    income.source = payload.source;
    income.description = payload.description;
    income.organization_id = payload.organization_id;
    income.recorded_by = payload.recorded_by;

    let created = state.store.incomes.create(&income).await?;
    state
        .store
        .record_audit(
            "income.create",
            "income",
            &created.id,
            created.recorded_by.clone(),
            Some(json!({ "amount": created.amount, "type": created.kind })),
        )
        .await?;
    log::info!("income {} recorded: {} {}", created.id, created.kind, created.amount);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_income(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Income>> {
    fetch(&state.store.incomes, &id).await
}

pub async fn update_income(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<Income>> {
    let updated = state.store.incomes.merge(&id, patch).await?;
    Ok(Json(updated))
}

pub async fn delete_income(Path(_id): Path<String>) -> ApiResult<Json<Value>> {
    Err(ApiError::not_implemented("deleting incomes"))
}
