//! Repository Integration Tests
//!
//! Tests for the in-memory collections and the record store.

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use crate::domain::{
        Account, DomainError, Expenditure, ExpenditureStatus, OrgTier, Organization,
    };
    use crate::repository::{seed_demo, RecordStore, Repository, ScopedRepository};

    fn patch(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("patch must be an object")
    }

    async fn create_org(store: &RecordStore, name: &str) -> Organization {
        let org = Organization::new(store.next_id::<Organization>(), name.to_string(), OrgTier::LC, None);
        store.organizations.create(&org).await.expect("Failed to create")
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = RecordStore::new();
        let created = create_org(&store, "Hope Chapel").await;

        assert!(created.id.starts_with("org-"));
        let found = store.organizations.find_by_id(&created.id).await.expect("Find failed");
        assert_eq!(found.unwrap().name, "Hope Chapel");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let store = RecordStore::new();
        let created = create_org(&store, "Hope Chapel").await;
        let err = store.organizations.create(&created).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = RecordStore::new();
        create_org(&store, "First").await;
        create_org(&store, "Second").await;

        let orgs = store.organizations.list().await.expect("List failed");
        let names: Vec<_> = orgs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = RecordStore::new();
        let ghost = Organization::new("org-404".into(), "Ghost".into(), OrgTier::GCC, None);
        let err = store.organizations.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_merge_is_shallow_and_stamps_updated_at() {
        let store = RecordStore::new();
        let created = create_org(&store, "Original").await;

        let merged = store
            .organizations
            .merge(&created.id, patch(json!({ "name": "Renamed", "address": "1 Church Rd" })))
            .await
            .expect("Merge failed");

        assert_eq!(merged.name, "Renamed");
        assert_eq!(merged.address.as_deref(), Some("1 Church Rd"));
        assert_eq!(merged.tier, OrgTier::LC);
        assert!(merged.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_merge_ignores_id_and_created_at() {
        let store = RecordStore::new();
        let created = create_org(&store, "Fixed").await;

        let merged = store
            .organizations
            .merge(
                &created.id,
                patch(json!({ "id": "org-hijack", "createdAt": "2000-01-01T00:00:00Z" })),
            )
            .await
            .unwrap();

        assert_eq!(merged.id, created.id);
        assert_eq!(merged.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_merge_rejects_invalid_values() {
        let store = RecordStore::new();
        let exp = Expenditure::new(
            store.next_id::<Expenditure>(),
            "Chairs".into(),
            300.0,
            "operational".into(),
            "user-1".into(),
            "org-1".into(),
        );
        store.expenditures.create(&exp).await.unwrap();

        let err = store
            .expenditures
            .merge(&exp.id, patch(json!({ "status": "paid" })))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let unchanged = store.expenditures.find_by_id(&exp.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, ExpenditureStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_unless_refuses_clash() {
        let store = RecordStore::new();
        create_org(&store, "Hope Chapel").await;
        let twin = Organization::new(store.next_id::<Organization>(), "hope chapel".into(), OrgTier::LC, None);

        let err = store
            .organizations
            .create_unless(&twin, |a, b| a.name.eq_ignore_ascii_case(&b.name))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.organizations.len().await, 1);
    }

    #[tokio::test]
    async fn test_merge_unless_ignores_self_and_refuses_clash() {
        let store = RecordStore::new();
        create_org(&store, "Hope Chapel").await;
        let other = create_org(&store, "Grace Chapel").await;
        let same_name = |a: &Organization, b: &Organization| a.name == b.name;

        let err = store
            .organizations
            .merge_unless(&other.id, patch(json!({ "name": "Hope Chapel" })), same_name)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let unchanged = store.organizations.find_by_id(&other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.name, "Grace Chapel");

        let merged = store
            .organizations
            .merge_unless(&other.id, patch(json!({ "address": "2 Hill St" })), same_name)
            .await
            .unwrap();
        assert_eq!(merged.address.as_deref(), Some("2 Hill St"));
    }

    #[tokio::test]
    async fn test_list_by_organization() {
        let store = RecordStore::new();
        for org in ["org-a", "org-b", "org-a"] {
            let exp = Expenditure::new(
                store.next_id::<Expenditure>(),
                "Item".into(),
                10.0,
                "operational".into(),
                "user-1".into(),
                org.into(),
            );
            store.expenditures.create(&exp).await.unwrap();
        }

        let scoped = store.expenditures.list_by_organization("org-a").await.unwrap();
        assert_eq!(scoped.len(), 2);
    }

    #[tokio::test]
    async fn test_accounts_may_share_number() {
        let store = RecordStore::new();
        let a = Account::new(store.next_id::<Account>(), "Building".into(), "12345".into());
        let b = Account::new(store.next_id::<Account>(), "Welfare".into(), "12345".into());
        store.accounts.create(&a).await.unwrap();
        store.accounts.create(&b).await.unwrap();
        assert_eq!(store.accounts.len().await, 2);
    }

    #[tokio::test]
    async fn test_modify_missing_is_not_found() {
        let store = RecordStore::new();
        let err = store
            .accounts
            .modify("account-404", |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_seed_demo_builds_hierarchy() {
        let store = RecordStore::new();
        seed_demo(&store, "hash".into()).await.unwrap();

        let orgs = store.organizations.list().await.unwrap();
        assert_eq!(orgs.len(), 4);
        assert!(orgs[0].is_root());
        for pair in orgs.windows(2) {
            assert_eq!(pair[1].parent_id.as_deref(), Some(pair[0].id.as_str()));
        }

        let admin = store.find_user_by_email("ADMIN@church.local").await.unwrap();
        assert_eq!(store.credential(&admin.id).await.as_deref(), Some("hash"));
    }

    #[tokio::test]
    async fn test_record_audit() {
        let store = RecordStore::new();
        let entry = store
            .record_audit("expenditure.approve", "expenditure", "expenditure-1", Some("user-1".into()), None)
            .await
            .unwrap();
        assert!(entry.id.starts_with("audit-"));
        assert_eq!(store.audit_logs.len().await, 1);
    }
}
