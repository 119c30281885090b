//! Organization Entity
//!
//! Units of the church hierarchy. Parent/child links form a tree through
//! `parent_id`; tiers follow the GCC > DCC > LCC > LC naming convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

/// Organization tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrgTier {
    GCC,
    DCC,
    LCC,
    LC,
}

impl OrgTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgTier::GCC => "GCC",
            OrgTier::DCC => "DCC",
            OrgTier::LCC => "LCC",
            OrgTier::LC => "LC",
        }
    }

    /// Case-insensitive parse; unknown tiers are an input error.
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GCC" => Ok(OrgTier::GCC),
            "DCC" => Ok(OrgTier::DCC),
            "LCC" => Ok(OrgTier::LCC),
            "LC" => Ok(OrgTier::LC),
            other => Err(DomainError::InvalidInput(format!(
                "unknown organization type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub tier: OrgTier,
    /// None = top of the tree
    pub parent_id: Option<String>,
    pub address: Option<String>,
    pub secretary_name: Option<String>,
    pub secretary_email: Option<String>,
    pub secretary_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(id: String, name: String, tier: OrgTier, parent_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            tier,
            parent_id,
            address: None,
            secretary_name: None,
            secretary_email: None,
            secretary_phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Entity for Organization {
    const KIND: &'static str = "org";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!(OrgTier::parse("lcc").unwrap(), OrgTier::LCC);
        assert!(OrgTier::parse("district").is_err());
    }

    #[test]
    fn test_serializes_tier_as_type() {
        let org = Organization::new("org-1".into(), "Accra".into(), OrgTier::DCC, Some("org-0".into()));
        let json = serde_json::to_value(&org).unwrap();
        assert_eq!(json["type"], "DCC");
        assert_eq!(json["parentId"], "org-0");
        assert!(!org.is_root());
    }
}
