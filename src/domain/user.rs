//! User Entity
//!
//! `role` is a free-text string (e.g. "admin", "CEL", "Treasurer"). It is
//! recorded on approval steps but not checked against any list.
//! Password hashes live in the store's credential table, never here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub organization_id: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, email: String, role: String, organization_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            name: None,
            role,
            organization_id,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}
