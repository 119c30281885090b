//! Approval steps recorded on expenditures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult};

/// What the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl ApprovalAction {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(ApprovalAction::Approve),
            "reject" => Ok(ApprovalAction::Reject),
            other => Err(DomainError::InvalidInput(format!(
                "action must be 'approve' or 'reject', got '{}'",
                other
            ))),
        }
    }

    pub fn decision(&self) -> ApprovalDecision {
        match self {
            ApprovalAction::Approve => ApprovalDecision::Approved,
            ApprovalAction::Reject => ApprovalDecision::Rejected,
        }
    }

    /// Audit log action name
    pub fn audit_action(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "expenditure.approve",
            ApprovalAction::Reject => "expenditure.reject",
        }
    }
}

/// Outcome recorded on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

/// One recorded decision. Steps are append-only and numbered from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStep {
    pub id: String,
    pub step: u32,
    pub role: String,
    pub user_id: String,
    pub status: ApprovalDecision,
    pub comments: Option<String>,
    pub timestamp: DateTime<Utc>,
}
