//! Sign-in / sign-up endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use super::extract::JsonBody;
use super::user_api::CreateUser;
use crate::domain::required;
use crate::services::auth::{self, Session};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn sign_in(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignInRequest>,
) -> ApiResult<Json<Session>> {
    let email = required(&payload.email, "email")?;
    let password = payload
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::invalid("password is required"))?;
    let session = auth::sign_in(&state.store, &state.config.auth_secret, email, password).await?;
    Ok(Json(session))
}

pub async fn sign_up(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> ApiResult<(StatusCode, Json<Session>)> {
    let new_user = payload.into_new_user()?;
    let session = auth::sign_up(&state.store, &state.config.auth_secret, new_user).await?;
    log::info!("user {} signed up", session.user.id);
    Ok((StatusCode::CREATED, Json(session)))
}
