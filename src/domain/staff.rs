//! Staff Entity
//!
//! Payroll-facing staff record; `salary` is the monthly gross.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: String,
    pub organization_id: Option<String>,
    pub salary: f64,
    /// e.g. "full-time", "part-time", "volunteer"
    pub employment_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    pub fn new(id: String, name: String, position: String, salary: f64) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email: None,
            phone: None,
            position,
            organization_id: None,
            salary,
            employment_type: None,
            start_date: None,
            status: StaffStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }
}

impl Entity for Staff {
    const KIND: &'static str = "staff";

    fn id(&self) -> &str {
        &self.id
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}
