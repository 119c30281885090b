//! Audit log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    /// Dotted action name, e.g. "expenditure.approve"
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        id: String,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        user_id: Option<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            user_id,
            details,
            timestamp: now,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for AuditLog {
    const KIND: &'static str = "audit";

    fn id(&self) -> &str {
        &self.id
    }
}
