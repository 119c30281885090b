//! Account and transaction endpoints
//!
//! Account numbers are not checked for uniqueness. Posting a transaction
//! moves the owning account's balance.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use super::fetch;
use crate::domain::{required, required_amount, Account, Transaction, TransactionKind};
use crate::repository::{Repository, ScopedRepository};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountQuery {
    pub organization_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    pub organization_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub account_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    pub account_id: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

pub async fn list_accounts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AccountQuery>,
) -> ApiResult<Json<Vec<Account>>> {
    let accounts = match query.organization_id.as_deref() {
        Some(org) => state.store.accounts.list_by_organization(org).await?,
        None => state.store.accounts.list().await?,
    };
    Ok(Json(accounts))
}

pub async fn create_account(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateAccount>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account_name = required(&payload.account_name, "accountName")?.to_string();
    let account_number = required(&payload.account_number, "accountNumber")?.to_string();
    let balance = payload.balance.unwrap_or(0.0);
    if !balance.is_finite() {
        return Err(ApiError::invalid("balance must be a finite number"));
    }

    let mut account = Account::new(state.store.next_id::<Account>(), account_name, account_number);
    account.bank_name = payload.bank_name;
    account.kind = payload.kind;
    account.balance = balance;
    account.currency = payload.currency;
    account.organization_id = payload.organization_id;

    let created = state.store.accounts.create(&account).await?;
    state
        .store
        .record_audit("account.create", "account", &created.id, None, None)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_account(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Account>> {
    fetch(&state.store.accounts, &id).await
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<Account>> {
    let updated = state.store.accounts.merge(&id, patch).await?;
    Ok(Json(updated))
}

pub async fn delete_account(Path(_id): Path<String>) -> ApiResult<Json<Value>> {
    Err(ApiError::not_implemented("deleting accounts"))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<TransactionQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let account_id = query.account_id;
    let transactions = state
        .store
        .transactions
        .filter(|t| account_id.as_deref().map_or(true, |a| t.account_id == a))
        .await;
    Ok(Json(transactions))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let account_id = required(&payload.account_id, "accountId")?.to_string();
    let amount = required_amount(payload.amount, "amount")?;
    if amount <= 0.0 {
        return Err(ApiError::invalid("amount must be positive"));
    }
    let kind = TransactionKind::parse(required(&payload.kind, "type")?)?;

    let balance = state
        .store
        .accounts
        .modify(&account_id, |account| {
            account.apply(kind, amount);
            Ok(account.balance)
        })
        .await?;

    let mut txn = Transaction::new(state.store.next_id::<Transaction>(), account_id, amount, kind);
    txn.description = payload.description;
    txn.reference = payload.reference;
    if let Some(date) = payload.date {
        txn.date = date;
    }

    let created = state.store.transactions.create(&txn).await?;
    state
        .store
        .record_audit(
            "transaction.create",
            "account",
            &created.account_id,
            payload.user_id,
            Some(json!({ "transactionId": created.id, "amount": amount, "balance": balance })),
        )
        .await?;
    log::info!("transaction {} posted, account {} balance {}", created.id, created.account_id, balance);
    Ok((StatusCode::CREATED, Json(created)))
}
