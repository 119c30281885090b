//! Reports, dashboard and audit log endpoints

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::error::ApiResult;
use super::extract::QueryParams;
use crate::domain::AuditLog;
use crate::services::reports::{self, DashboardMetrics, Report, ReportFilter, ReportKind};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub organization_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub organization_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

/// `type` defaults to `financial`
pub async fn get_report(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> ApiResult<Json<Report>> {
    let kind = ReportKind::parse(query.kind.as_deref().unwrap_or("financial"))?;
    let filter = ReportFilter::new(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.organization_id,
    )?;
    let report = reports::generate(&state.store, kind, &filter).await?;
    Ok(Json(report))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DashboardQuery>,
) -> ApiResult<Json<DashboardMetrics>> {
    let metrics = reports::dashboard(&state.store, query.organization_id.as_deref()).await?;
    Ok(Json(metrics))
}

/// Newest first
pub async fn list_audit_logs(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AuditQuery>,
) -> ApiResult<Json<Vec<AuditLog>>> {
    let mut logs = state
        .store
        .audit_logs
        .filter(|l| {
            query.entity_type.as_deref().map_or(true, |t| l.entity_type == t)
                && query.entity_id.as_deref().map_or(true, |id| l.entity_id == id)
        })
        .await;
    logs.reverse();
    Ok(Json(logs))
}
