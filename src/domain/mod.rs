//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no HTTP or storage dependencies.

mod account;
mod approval;
mod audit;
mod entity;
mod expenditure;
mod id;
mod income;
mod organization;
mod staff;
mod user;

pub use account::{Account, Transaction, TransactionKind};
pub use approval::{ApprovalAction, ApprovalDecision, ApprovalStep};
pub use audit::AuditLog;
pub use entity::{required, required_amount, DomainError, DomainResult, Entity};
pub use expenditure::{Expenditure, ExpenditureStatus};
pub use id::IdGenerator;
pub use income::{Income, IncomeStatus};
pub use organization::{OrgTier, Organization};
pub use staff::{Staff, StaffStatus};
pub use user::User;
