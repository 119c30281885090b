//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all stored records.
//! Every record has a string id of the form `<kind>-<millis>` and can be
//! round-tripped through JSON (the store's update path is a JSON merge).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone + Serialize + DeserializeOwned + 'static {
    /// Prefix used when generating ids for this entity
    const KIND: &'static str;

    /// Returns the entity's unique identifier
    fn id(&self) -> &str;

    /// Owning organization, for entities scoped to one
    fn organization_id(&self) -> Option<&str> {
        None
    }
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainError {
    NotFound(String),
    InvalidInput(String),
    Conflict(String),
    Unauthorized(String),
    NotImplemented(String),
    Internal(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            DomainError::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Presence check used by request payloads: `Some` and non-blank.
pub fn required<'a>(value: &'a Option<String>, field: &str) -> DomainResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::InvalidInput(format!("{} is required", field))),
    }
}

/// Presence check for numeric amounts.
pub fn required_amount(value: Option<f64>, field: &str) -> DomainResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(DomainError::InvalidInput(format!("{} must be a finite number", field))),
        None => Err(DomainError::InvalidInput(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(&None, "name").is_err());
        assert!(required(&Some("   ".to_string()), "name").is_err());
        assert_eq!(required(&Some(" GCC ".to_string()), "type").unwrap(), "GCC");
    }

    #[test]
    fn test_required_amount() {
        assert_eq!(required_amount(Some(12.5), "amount").unwrap(), 12.5);
        assert!(required_amount(None, "amount").is_err());
        assert!(required_amount(Some(f64::NAN), "amount").is_err());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::NotFound("expenditure exp-1".into());
        assert_eq!(err.to_string(), "Not found: expenditure exp-1");
    }
}
