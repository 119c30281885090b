//! Expenditure Entity
//!
//! A spending request with its approval flow. Status moves
//! draft -> pending -> approved/rejected -> disbursed, but only
//! `record_decision` sets approved/rejected and it does so on the first
//! decision, whatever came before.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::approval::{ApprovalAction, ApprovalDecision, ApprovalStep};
use super::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenditureStatus {
    Draft,
    #[default]
    Pending,
    Approved,
    Rejected,
    Disbursed,
}

impl ExpenditureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenditureStatus::Draft => "draft",
            ExpenditureStatus::Pending => "pending",
            ExpenditureStatus::Approved => "approved",
            ExpenditureStatus::Rejected => "rejected",
            ExpenditureStatus::Disbursed => "disbursed",
        }
    }

    /// Draft and pending requests are still open for a decision.
    pub fn is_open(&self) -> bool {
        matches!(self, ExpenditureStatus::Draft | ExpenditureStatus::Pending)
    }
}

impl From<ApprovalDecision> for ExpenditureStatus {
    fn from(d: ApprovalDecision) -> Self {
        match d {
            ApprovalDecision::Approved => ExpenditureStatus::Approved,
            ApprovalDecision::Rejected => ExpenditureStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expenditure {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    /// Free-form spending type, e.g. "operational", "project", "welfare"
    #[serde(rename = "type")]
    pub kind: String,
    pub category: Option<String>,
    pub status: ExpenditureStatus,
    pub requested_by: String,
    pub organization_id: String,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub approval_flow: Vec<ApprovalStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expenditure {
    pub fn new(
        id: String,
        title: String,
        amount: f64,
        kind: String,
        requested_by: String,
        organization_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: None,
            amount,
            kind,
            category: None,
            status: ExpenditureStatus::Pending,
            requested_by,
            organization_id,
            due_date: None,
            approval_flow: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a step for `action` and settle the status from it.
    pub fn record_decision(
        &mut self,
        step_id: String,
        action: ApprovalAction,
        role: String,
        user_id: String,
        comments: Option<String>,
    ) -> &ApprovalStep {
        let now = Utc::now();
        let decision = action.decision();
        let step = ApprovalStep {
            id: step_id,
            step: self.approval_flow.len() as u32 + 1,
            role,
            user_id,
            status: decision,
            comments,
            timestamp: now,
        };
        self.approval_flow.push(step);
        self.status = decision.into();
        self.updated_at = now;
        &self.approval_flow[self.approval_flow.len() - 1]
    }
}

impl Entity for Expenditure {
    const KIND: &'static str = "expenditure";

    fn id(&self) -> &str {
        &self.id
    }

    fn organization_id(&self) -> Option<&str> {
        Some(&self.organization_id)
    }
}
