//! Account and Transaction Entities
//!
//! Account numbers are not unique; two accounts may share one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub account_name: String,
    pub account_number: String,
    pub bank_name: Option<String>,
    /// e.g. "current", "savings"
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub balance: f64,
    pub currency: Option<String>,
    pub organization_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: String, account_name: String, account_number: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            account_name,
            account_number,
            bank_name: None,
            kind: None,
            balance: 0.0,
            currency: None,
            organization_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a transaction to the running balance.
    pub fn apply(&mut self, kind: TransactionKind, amount: f64) {
        match kind {
            TransactionKind::Credit => self.balance += amount,
            TransactionKind::Debit => self.balance -= amount,
        }
        self.updated_at = Utc::now();
    }
}

impl Entity for Account {
    const KIND: &'static str = "account";

    fn id(&self) -> &str {
        &self.id
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            other => Err(DomainError::InvalidInput(format!(
                "transaction type must be 'credit' or 'debit', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(id: String, account_id: String, amount: f64, kind: TransactionKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            account_id,
            amount,
            kind,
            description: None,
            reference: None,
            date: now,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Transaction {
    const KIND: &'static str = "txn";

    fn id(&self) -> &str {
        &self.id
    }
}
