//! In-memory repository
//!
//! A process-local `Vec` behind a `tokio::sync::RwLock`. Each call is
//! atomic on its own collection; nothing spans collections.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::traits::{Repository, ScopedRepository};
use crate::domain::{DomainError, DomainResult, Entity};

const IMMUTABLE_FIELDS: [&str; 2] = ["id", "createdAt"];

pub struct MemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Records matching `pred`, in insertion order
    pub async fn filter<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| pred(*r))
            .cloned()
            .collect()
    }

    /// Mutate one record in place while holding the write lock.
    pub async fn modify<R, F>(&self, id: &str, f: F) -> DomainResult<R>
    where
        F: FnOnce(&mut T) -> DomainResult<R> + Send,
        R: Send,
    {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        f(record)
    }

    /// Insert `entity` unless an existing record `clashes` with it.
    ///
    /// The check and the insert happen under one write lock.
    pub async fn create_unless<F>(&self, entity: &T, clashes: F) -> DomainResult<T>
    where
        F: Fn(&T, &T) -> bool + Send,
    {
        let mut records = self.records.write().await;
        if let Some(existing) = records
            .iter()
            .find(|r| r.id() == entity.id() || clashes(*r, entity))
        {
            return Err(conflict::<T>(entity.id(), existing.id()));
        }
        records.push(entity.clone());
        Ok(entity.clone())
    }

    /// Shallow merge, refused when the merged record clashes with another one.
    pub async fn merge_unless<F>(&self, id: &str, patch: Map<String, Value>, clashes: F) -> DomainResult<T>
    where
        F: Fn(&T, &T) -> bool + Send,
    {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;

        let mut value =
            serde_json::to_value(&records[index]).map_err(|e| DomainError::Internal(e.to_string()))?;
        let fields = value
            .as_object_mut()
            .ok_or_else(|| DomainError::Internal(format!("{} is not a JSON object", T::KIND)))?;

        for (key, val) in patch {
            if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            fields.insert(key, val);
        }
        fields.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));

        let merged: T = serde_json::from_value(value)
            .map_err(|e| DomainError::InvalidInput(format!("invalid {} update: {}", T::KIND, e)))?;
        if let Some(other) = records
            .iter()
            .find(|r| r.id() != id && clashes(*r, &merged))
        {
            return Err(conflict::<T>(id, other.id()));
        }
        records[index] = merged.clone();
        Ok(merged)
    }
}

fn not_found<T: Entity>(id: &str) -> DomainError {
    DomainError::NotFound(format!("{} {}", T::KIND, id))
}

fn conflict<T: Entity>(id: &str, existing: &str) -> DomainError {
    DomainError::Conflict(format!("{} {} conflicts with {} {}", T::KIND, id, T::KIND, existing))
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn create(&self, entity: &T) -> DomainResult<T> {
        self.create_unless(entity, |_, _| false).await
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn update(&self, entity: &T) -> DomainResult<T> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or_else(|| not_found::<T>(entity.id()))?;
        *slot = entity.clone();
        Ok(entity.clone())
    }

    async fn merge(&self, id: &str, patch: Map<String, Value>) -> DomainResult<T> {
        self.merge_unless(id, patch, |_, _| false).await
    }
}

#[async_trait]
impl<T: Entity> ScopedRepository<T> for MemoryRepository<T> {
    async fn list_by_organization(&self, organization_id: &str) -> DomainResult<Vec<T>> {
        Ok(self
            .filter(|r| r.organization_id() == Some(organization_id))
            .await)
    }
}
