//! Staff endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use super::fetch;
use crate::domain::{required, Staff, StaffStatus};
use crate::repository::{Repository, ScopedRepository};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffQuery {
    pub organization_id: Option<String>,
    pub status: Option<StaffStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaff {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub organization_id: Option<String>,
    pub salary: Option<f64>,
    pub employment_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub status: Option<StaffStatus>,
}

pub async fn list_staff(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StaffQuery>,
) -> ApiResult<Json<Vec<Staff>>> {
    let staff = match query.organization_id.as_deref() {
        Some(org) => state.store.staff.list_by_organization(org).await?,
        None => state.store.staff.list().await?,
    };
    let staff = match query.status {
        Some(status) => staff.into_iter().filter(|s| s.status == status).collect(),
        None => staff,
    };
    Ok(Json(staff))
}

pub async fn create_staff(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateStaff>,
) -> ApiResult<(StatusCode, Json<Staff>)> {
    let name = required(&payload.name, "name")?.to_string();
    let position = required(&payload.position, "position")?.to_string();
    let salary = payload.salary.unwrap_or(0.0);
    if !salary.is_finite() || salary < 0.0 {
        return Err(ApiError::invalid("salary must be a non-negative number"));
    }

    let mut member = Staff::new(state.store.next_id::<Staff>(), name, position, salary);
    member.email = payload.email;
    member.phone = payload.phone;
    member.organization_id = payload.organization_id;
    member.employment_type = payload.employment_type;
    member.start_date = payload.start_date;
    member.status = payload.status.unwrap_or_default();

    let created = state.store.staff.create(&member).await?;
    state
        .store
        .record_audit("staff.create", "staff", &created.id, None, None)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_staff(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Staff>> {
    fetch(&state.store.staff, &id).await
}

pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<Staff>> {
    let updated = state.store.staff.merge(&id, patch).await?;
    Ok(Json(updated))
}

pub async fn delete_staff(Path(_id): Path<String>) -> ApiResult<Json<Value>> {
    Err(ApiError::not_implemented("deleting staff"))
}
