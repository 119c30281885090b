//! Approval endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use crate::domain::{required, ApprovalAction, ApprovalStep, Expenditure};
use crate::repository::Repository;
use crate::services::approval::{self, Decision};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub expenditure_id: Option<String>,
    pub action: Option<String>,
    pub comments: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingQuery {
    pub organization_id: Option<String>,
}

/// Record an approve/reject decision and return the updated expenditure
pub async fn decide(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ApprovalRequest>,
) -> ApiResult<Json<Expenditure>> {
    let decision = Decision {
        expenditure_id: required(&payload.expenditure_id, "expenditureId")?.to_string(),
        action: ApprovalAction::parse(required(&payload.action, "action")?)?,
        comments: payload.comments.filter(|c| !c.trim().is_empty()),
        user_id: required(&payload.user_id, "userId")?.to_string(),
    };
    let updated = approval::decide(&state.store, decision, state.config.strict_approvals).await?;
    Ok(Json(updated))
}

/// Expenditures still waiting for a decision
pub async fn list_pending(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PendingQuery>,
) -> ApiResult<Json<Vec<Expenditure>>> {
    let pending = approval::pending(&state.store, query.organization_id.as_deref()).await?;
    Ok(Json(pending))
}

/// Approval flow of one expenditure
pub async fn approval_flow(
    State(state): State<AppState>,
    Path(expenditure_id): Path<String>,
) -> ApiResult<Json<Vec<ApprovalStep>>> {
    let exp = state
        .store
        .expenditures
        .find_by_id(&expenditure_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("expenditure {}", expenditure_id)))?;
    Ok(Json(exp.approval_flow))
}
