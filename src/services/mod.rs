//! Services Layer
//!
//! Workflows that span more than one collection or compute over them:
//! approvals, authentication, reports.

pub mod approval;
pub mod auth;
pub mod reports;
