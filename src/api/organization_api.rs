//! Organization endpoints
//!
//! CRUD over the GCC/DCC/LCC/LC hierarchy plus child listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use super::fetch;
use crate::domain::{required, OrgTier, Organization};
use crate::repository::Repository;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationQuery {
    #[serde(rename = "type")]
    pub tier: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganization {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tier: Option<String>,
    pub parent_id: Option<String>,
    pub address: Option<String>,
    pub secretary_name: Option<String>,
    pub secretary_email: Option<String>,
    pub secretary_phone: Option<String>,
    pub user_id: Option<String>,
}

/// A referenced parent must already exist.
async fn ensure_parent(state: &AppState, parent_id: Option<&str>) -> ApiResult<()> {
    if let Some(parent) = parent_id {
        if state.store.organizations.find_by_id(parent).await?.is_none() {
            return Err(ApiError::invalid(format!("parent organization {} does not exist", parent)));
        }
    }
    Ok(())
}

pub async fn list_organizations(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OrganizationQuery>,
) -> ApiResult<Json<Vec<Organization>>> {
    let tier = query.tier.as_deref().map(OrgTier::parse).transpose()?;
    let parent = query.parent_id;
    let orgs = state
        .store
        .organizations
        .filter(|o| {
            tier.map_or(true, |t| o.tier == t)
                && parent.as_deref().map_or(true, |p| o.parent_id.as_deref() == Some(p))
        })
        .await;
    Ok(Json(orgs))
}

pub async fn create_organization(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateOrganization>,
) -> ApiResult<(StatusCode, Json<Organization>)> {
    let name = required(&payload.name, "name")?;
    let tier = OrgTier::parse(required(&payload.tier, "type")?)?;
    let parent_id = payload.parent_id.filter(|p| !p.trim().is_empty());
    ensure_parent(&state, parent_id.as_deref()).await?;

    let mut org = Organization::new(
        state.store.next_id::<Organization>(),
        name.to_string(),
        tier,
        parent_id,
    );
    org.address = payload.address;
    org.secretary_name = payload.secretary_name;
    org.secretary_email = payload.secretary_email;
    org.secretary_phone = payload.secretary_phone;

    let created = state.store.organizations.create(&org).await?;
    state
        .store
        .record_audit("organization.create", "organization", &created.id, payload.user_id, None)
        .await?;
    log::info!("created {} organization {}", created.tier.as_str(), created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Organization>> {
    fetch(&state.store.organizations, &id).await
}

pub async fn update_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<Organization>> {
    if let Some(Value::String(parent)) = patch.get("parentId") {
        if parent == &id {
            return Err(ApiError::invalid("an organization cannot be its own parent"));
        }
        ensure_parent(&state, Some(parent)).await?;
    }
    let updated = state.store.organizations.merge(&id, patch).await?;
    Ok(Json(updated))
}

pub async fn delete_organization(Path(_id): Path<String>) -> ApiResult<Json<Value>> {
    Err(ApiError::not_implemented("deleting organizations"))
}

/// Direct children of an organization
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Organization>>> {
    if state.store.organizations.find_by_id(&id).await?.is_none() {
        return Err(ApiError::not_found(format!("organization {}", id)));
    }
    let children = state
        .store
        .organizations
        .filter(|o| o.parent_id.as_deref() == Some(id.as_str()))
        .await;
    Ok(Json(children))
}
