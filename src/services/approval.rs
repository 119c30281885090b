//! Approval progression
//!
//! One call records one decision: a step is appended to the expenditure's
//! approval flow, the expenditure status is set from the decision, and an
//! audit entry is written. There is no multi-role sequencing; the first
//! approve settles the record.

use serde_json::json;

use crate::domain::{
    ApprovalAction, DomainError, DomainResult, Expenditure, ExpenditureStatus,
};
use crate::repository::{RecordStore, Repository, ScopedRepository};

/// Role recorded when the actor is not a known user
const UNKNOWN_ROLE: &str = "unknown";

#[derive(Debug, Clone)]
pub struct Decision {
    pub expenditure_id: String,
    pub action: ApprovalAction,
    pub comments: Option<String>,
    pub user_id: String,
}

/// Record `decision` on its expenditure.
///
/// With `strict` set, expenditures that are no longer draft/pending are
/// refused with a conflict instead of being overwritten.
pub async fn decide(store: &RecordStore, decision: Decision, strict: bool) -> DomainResult<Expenditure> {
    let role = store
        .users
        .find_by_id(&decision.user_id)
        .await?
        .map(|u| u.role)
        .unwrap_or_else(|| UNKNOWN_ROLE.to_string());
    let step_id = store.next_raw_id("step");

    let Decision {
        expenditure_id,
        action,
        comments,
        user_id,
    } = decision;

    let updated = store
        .expenditures
        .modify(&expenditure_id, |exp| {
            if strict && !exp.status.is_open() {
                return Err(DomainError::Conflict(format!(
                    "expenditure {} is already {}",
                    exp.id,
                    exp.status.as_str()
                )));
            }
            exp.record_decision(step_id, action, role, user_id.clone(), comments.clone());
            Ok(exp.clone())
        })
        .await?;

    let step = updated.approval_flow.last().map(|s| s.step).unwrap_or_default();
    store
        .record_audit(
            action.audit_action(),
            "expenditure",
            &updated.id,
            Some(user_id),
            Some(json!({
                "step": step,
                "status": updated.status.as_str(),
                "comments": comments,
            })),
        )
        .await?;

    log::info!(
        "expenditure {} {} at step {}",
        updated.id,
        updated.status.as_str(),
        step
    );
    Ok(updated)
}

/// Expenditures awaiting a decision, optionally within one organization
pub async fn pending(store: &RecordStore, organization_id: Option<&str>) -> DomainResult<Vec<Expenditure>> {
    let candidates = match organization_id {
        Some(org) => store.expenditures.list_by_organization(org).await?,
        None => store.expenditures.list().await?,
    };
    Ok(candidates
        .into_iter()
        .filter(|e| e.status == ExpenditureStatus::Pending)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApprovalDecision, User};

    async fn setup() -> (RecordStore, Expenditure) {
        let store = RecordStore::new();
        let exp = Expenditure::new(
            store.next_id::<Expenditure>(),
            "Sound system".into(),
            2500.0,
            "project".into(),
            "user-requester".into(),
            "org-1".into(),
        );
        store.expenditures.create(&exp).await.unwrap();
        let cel = User::new("user-cel".into(), "cel@church.local".into(), "CEL".into(), None);
        store.users.create(&cel).await.unwrap();
        (store, exp)
    }

    fn decision(id: &str, action: ApprovalAction, user: &str) -> Decision {
        Decision {
            expenditure_id: id.to_string(),
            action,
            comments: Some("ok".into()),
            user_id: user.to_string(),
        }
    }

    #[tokio::test]
    async fn test_approve_once() {
        let (store, exp) = setup().await;
        let updated = decide(&store, decision(&exp.id, ApprovalAction::Approve, "user-cel"), false)
            .await
            .unwrap();

        assert_eq!(updated.status, ExpenditureStatus::Approved);
        assert_eq!(updated.approval_flow.len(), 1);
        let step = &updated.approval_flow[0];
        assert_eq!(step.status, ApprovalDecision::Approved);
        assert_eq!(step.role, "CEL");
        assert_eq!(step.step, 1);

        let logs = store.audit_logs.list().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "expenditure.approve");
        assert_eq!(logs[0].entity_id, exp.id);
    }

    #[tokio::test]
    async fn test_reject_sets_rejected() {
        let (store, exp) = setup().await;
        let updated = decide(&store, decision(&exp.id, ApprovalAction::Reject, "user-cel"), false)
            .await
            .unwrap();
        assert_eq!(updated.status, ExpenditureStatus::Rejected);
    }

    #[tokio::test]
    async fn test_unknown_actor_gets_unknown_role() {
        let (store, exp) = setup().await;
        let updated = decide(&store, decision(&exp.id, ApprovalAction::Approve, "user-ghost"), false)
            .await
            .unwrap();
        assert_eq!(updated.approval_flow[0].role, UNKNOWN_ROLE);
    }

    #[tokio::test]
    async fn test_missing_expenditure_is_not_found() {
        let (store, _) = setup().await;
        let err = decide(&store, decision("expenditure-404", ApprovalAction::Approve, "user-cel"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(store.audit_logs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lenient_mode_allows_double_approval() {
        let (store, exp) = setup().await;
        decide(&store, decision(&exp.id, ApprovalAction::Approve, "user-cel"), false).await.unwrap();
        let again = decide(&store, decision(&exp.id, ApprovalAction::Approve, "user-cel"), false)
            .await
            .unwrap();
        assert_eq!(again.approval_flow.len(), 2);
        assert_eq!(again.approval_flow[1].step, 2);
    }

    #[tokio::test]
    async fn test_strict_mode_refuses_settled() {
        let (store, exp) = setup().await;
        decide(&store, decision(&exp.id, ApprovalAction::Approve, "user-cel"), true).await.unwrap();
        let err = decide(&store, decision(&exp.id, ApprovalAction::Reject, "user-cel"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let stored = store.expenditures.find_by_id(&exp.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ExpenditureStatus::Approved);
        assert_eq!(stored.approval_flow.len(), 1);
    }

    #[tokio::test]
    async fn test_pending_excludes_settled() {
        let (store, exp) = setup().await;
        assert_eq!(pending(&store, None).await.unwrap().len(), 1);
        decide(&store, decision(&exp.id, ApprovalAction::Approve, "user-cel"), false).await.unwrap();
        assert!(pending(&store, Some("org-1")).await.unwrap().is_empty());
    }
}
