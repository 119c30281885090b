//! User endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use super::fetch;
use crate::domain::{required, User};
use crate::repository::{Repository, ScopedRepository};
use crate::services::auth::{self, NewUser};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub organization_id: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub organization_id: Option<String>,
    pub phone: Option<String>,
}

impl CreateUser {
    pub fn into_new_user(self) -> ApiResult<NewUser> {
        let email = required(&self.email, "email")?.to_string();
        Ok(NewUser {
            email,
            password: self.password,
            name: self.name,
            role: self.role,
            organization_id: self.organization_id,
            phone: self.phone,
        })
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let users = match query.organization_id.as_deref() {
        Some(org) => state.store.users.list_by_organization(org).await?,
        None => state.store.users.list().await?,
    };
    let users = match query.role {
        Some(role) => users
            .into_iter()
            .filter(|u| u.role.eq_ignore_ascii_case(&role))
            .collect(),
        None => users,
    };
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let new_user = payload.into_new_user()?;
    let user = auth::register(&state.store, &state.config.auth_secret, new_user).await?;
    log::info!("created user {} ({})", user.id, user.role);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    fetch(&state.store.users, &id).await
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<User>> {
    let updated = auth::update_user(&state.store, &id, patch).await?;
    Ok(Json(updated))
}

pub async fn delete_user(Path(_id): Path<String>) -> ApiResult<Json<Value>> {
    Err(ApiError::not_implemented("deleting users"))
}
