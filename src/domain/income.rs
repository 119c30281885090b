//! Income Entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Reconciliation state. Nothing moves an income between these on its
/// own; only an explicit update changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IncomeStatus {
    #[default]
    Pending,
    Confirmed,
    Reconciled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub amount: f64,
    /// e.g. "tithe", "offering", "donation"
    #[serde(rename = "type")]
    pub kind: String,
    pub status: IncomeStatus,
    pub date: NaiveDate,
    pub source: Option<String>,
    pub description: Option<String>,
    pub organization_id: Option<String>,
    pub recorded_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    pub fn new(id: String, amount: f64, kind: String, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id,
            amount,
            kind,
            status: IncomeStatus::Pending,
            date,
            source: None,
            description: None,
            organization_id: None,
            recorded_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Income {
    const KIND: &'static str = "income";

    fn id(&self) -> &str {
        &self.id
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}
