//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! The only implementation today is the in-memory mock store.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{DomainResult, Entity};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type. Records are never deleted.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Store a new entity; its id must not be taken
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<T>>;

    /// List all entities in insertion order
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Replace an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Shallow-merge `patch` over the stored record and stamp `updatedAt`.
    /// `id` and `createdAt` are never overwritten.
    async fn merge(&self, id: &str, patch: Map<String, Value>) -> DomainResult<T>;
}

/// Extension for entities that belong to an organization
#[async_trait]
pub trait ScopedRepository<T: Entity>: Repository<T> {
    async fn list_by_organization(&self, organization_id: &str) -> DomainResult<Vec<T>>;
}
