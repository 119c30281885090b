//! HTTP surface
//!
//! One module per resource. Handlers validate the payload, call the store
//! or a service, and answer JSON. Routing lives in [`build_router`].

mod account_api;
mod approval_api;
mod auth_api;
pub mod error;
mod expenditure_api;
mod extract;
mod income_api;
mod middleware;
mod organization_api;
mod report_api;
mod staff_api;
mod user_api;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::domain::Entity;
use crate::repository::{MemoryRepository, Repository};
use crate::AppState;
use error::{ApiError, ApiResult};

/// Load one record or answer 404
pub(crate) async fn fetch<T: Entity>(repo: &MemoryRepository<T>, id: &str) -> ApiResult<Json<T>> {
    repo.find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("{} {}", T::KIND, id)))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    let api = Router::new()
        .route("/auth/signin", post(auth_api::sign_in))
        .route("/auth/signup", post(auth_api::sign_up))
        .route(
            "/organizations",
            get(organization_api::list_organizations).post(organization_api::create_organization),
        )
        .route(
            "/organizations/:id",
            get(organization_api::get_organization)
                .put(organization_api::update_organization)
                .delete(organization_api::delete_organization),
        )
        .route("/organizations/:id/children", get(organization_api::list_children))
        .route("/users", get(user_api::list_users).post(user_api::create_user))
        .route(
            "/users/:id",
            get(user_api::get_user)
                .put(user_api::update_user)
                .delete(user_api::delete_user),
        )
        .route(
            "/expenditures",
            get(expenditure_api::list_expenditures).post(expenditure_api::create_expenditure),
        )
        .route(
            "/expenditures/:id",
            get(expenditure_api::get_expenditure)
                .put(expenditure_api::update_expenditure)
                .delete(expenditure_api::delete_expenditure),
        )
        .route("/approvals", get(approval_api::list_pending).post(approval_api::decide))
        .route("/approvals/:expenditure_id", get(approval_api::approval_flow))
        .route("/incomes", get(income_api::list_incomes).post(income_api::create_income))
        .route(
            "/incomes/:id",
            get(income_api::get_income)
                .put(income_api::update_income)
                .delete(income_api::delete_income),
        )
        .route("/staff", get(staff_api::list_staff).post(staff_api::create_staff))
        .route(
            "/staff/:id",
            get(staff_api::get_staff)
                .put(staff_api::update_staff)
                .delete(staff_api::delete_staff),
        )
        .route("/accounts", get(account_api::list_accounts).post(account_api::create_account))
        .route(
            "/accounts/:id",
            get(account_api::get_account)
                .put(account_api::update_account)
                .delete(account_api::delete_account),
        )
        .route(
            "/transactions",
            get(account_api::list_transactions).post(account_api::create_transaction),
        )
        .route("/audit-logs", get(report_api::list_audit_logs))
        .route("/reports", get(report_api::get_report))
        .route("/dashboard", get(report_api::get_dashboard));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::request_log))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
