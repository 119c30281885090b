//! Record Store
//!
//! The mock database: one in-memory collection per record type plus the
//! credential table and the id generator. Shared across handlers behind an
//! `Arc`.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::memory_repo::MemoryRepository;
use super::traits::Repository;
use crate::domain::{
    Account, AuditLog, DomainResult, Entity, Expenditure, IdGenerator, Income, Organization,
    Staff, Transaction, User,
};

#[derive(Default)]
pub struct RecordStore {
    ids: IdGenerator,
    pub organizations: MemoryRepository<Organization>,
    pub users: MemoryRepository<User>,
    pub expenditures: MemoryRepository<Expenditure>,
    pub incomes: MemoryRepository<Income>,
    pub staff: MemoryRepository<Staff>,
    pub accounts: MemoryRepository<Account>,
    pub transactions: MemoryRepository<Transaction>,
    pub audit_logs: MemoryRepository<AuditLog>,
    /// user id -> password hash
    credentials: RwLock<HashMap<String, String>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh id for a record of type `T`
    pub fn next_id<T: Entity>(&self) -> String {
        self.ids.next(T::KIND)
    }

    /// Id for nested values that are not collections of their own
    pub fn next_raw_id(&self, kind: &str) -> String {
        self.ids.next(kind)
    }

    pub async fn set_credential(&self, user_id: &str, password_hash: String) {
        self.credentials
            .write()
            .await
            .insert(user_id.to_string(), password_hash);
    }

    pub async fn credential(&self, user_id: &str) -> Option<String> {
        self.credentials.read().await.get(user_id).cloned()
    }

    /// Case-insensitive email lookup
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_ascii_lowercase();
        self.users
            .filter(|u| u.email.to_ascii_lowercase() == email)
            .await
            .into_iter()
            .next()
    }

    /// Append an audit entry
    pub async fn record_audit(
        &self,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        user_id: Option<String>,
        details: Option<serde_json::Value>,
    ) -> DomainResult<AuditLog> {
        let entry = AuditLog::new(
            self.next_id::<AuditLog>(),
            action,
            entity_type,
            entity_id,
            user_id,
            details,
        );
        self.audit_logs.create(&entry).await
    }
}
