//! Demo data
//!
//! A small hierarchy (GCC > DCC > LCC > LC), an admin user and a general
//! fund account, so a fresh server has something to show.

use super::store::RecordStore;
use super::traits::Repository;
use crate::domain::{Account, DomainResult, OrgTier, Organization, User};

pub const DEMO_ADMIN_EMAIL: &str = "admin@church.local";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";

pub async fn seed_demo(store: &RecordStore, admin_password_hash: String) -> DomainResult<()> {
    let mut parent: Option<String> = None;
    let mut top: Option<String> = None;
    for (name, tier) in [
        ("General Council", OrgTier::GCC),
        ("Central District", OrgTier::DCC),
        ("Riverside Local Council", OrgTier::LCC),
        ("Riverside Local Church", OrgTier::LC),
    ] {
        let org = Organization::new(
            store.next_id::<Organization>(),
            name.to_string(),
            tier,
            parent.clone(),
        );
        let created = store.organizations.create(&org).await?;
        top.get_or_insert_with(|| created.id.clone());
        parent = Some(created.id);
    }

    let mut admin = User::new(
        store.next_id::<User>(),
        DEMO_ADMIN_EMAIL.to_string(),
        "admin".to_string(),
        top.clone(),
    );
    admin.name = Some("Administrator".to_string());
    let admin = store.users.create(&admin).await?;
    store.set_credential(&admin.id, admin_password_hash).await;

    let mut fund = Account::new(
        store.next_id::<Account>(),
        "General Fund".to_string(),
        "0000000001".to_string(),
    );
    fund.organization_id = top;
    store.accounts.create(&fund).await?;

    log::info!("seeded demo data ({} organizations)", store.organizations.len().await);
    Ok(())
}
