//! Sign-in and sign-up
//!
//! Passwords are stored as keyed blake3 digests. Tokens are opaque:
//! base64url of a keyed digest over the user id and issue time. Nothing in
//! the service verifies them.

use std::sync::OnceLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{DomainError, DomainResult, User};
use crate::repository::{RecordStore, Repository};

const PASSWORD_CONTEXT: &str = "church-finance 2024 password hashing";
const TOKEN_CONTEXT: &str = "church-finance 2024 session token";

/// Result of a successful sign-in
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Fields accepted when registering a user
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub organization_id: Option<String>,
    pub phone: Option<String>,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

pub fn hash_password(secret: &str, password: &str) -> String {
    let key = blake3::derive_key(PASSWORD_CONTEXT, secret.as_bytes());
    blake3::keyed_hash(&key, password.as_bytes()).to_hex().to_string()
}

pub fn verify_password(secret: &str, password: &str, stored_hash: &str) -> bool {
    let key = blake3::derive_key(PASSWORD_CONTEXT, secret.as_bytes());
    match blake3::Hash::from_hex(stored_hash) {
        // Hash equality is constant-time.
        Ok(stored) => blake3::keyed_hash(&key, password.as_bytes()) == stored,
        Err(_) => false,
    }
}

pub fn issue_token(secret: &str, user_id: &str) -> String {
    let key = blake3::derive_key(TOKEN_CONTEXT, secret.as_bytes());
    let issued_at = chrono::Utc::now().timestamp_millis();
    let digest = blake3::keyed_hash(&key, format!("{}:{}", user_id, issued_at).as_bytes());
    URL_SAFE_NO_PAD.encode(digest.as_bytes())
}

pub async fn sign_in(store: &RecordStore, secret: &str, email: &str, password: &str) -> DomainResult<Session> {
    let invalid = || DomainError::Unauthorized("invalid email or password".into());

    let user = store.find_user_by_email(email).await.ok_or_else(invalid)?;
    let stored = store.credential(&user.id).await.ok_or_else(invalid)?;
    if !verify_password(secret, password, &stored) {
        log::warn!("failed sign-in for {}", user.id);
        return Err(invalid());
    }

    log::info!("user {} signed in", user.id);
    Ok(Session {
        token: issue_token(secret, &user.id),
        user,
    })
}

/// Create a user, storing a credential when a password is given.
pub async fn register(store: &RecordStore, secret: &str, new_user: NewUser) -> DomainResult<User> {
    let email = new_user.email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(DomainError::InvalidInput(format!("'{}' is not a valid email", email)));
    }
    let mut user = User::new(
        store.next_id::<User>(),
        email.clone(),
        new_user.role.unwrap_or_else(|| "member".to_string()),
        new_user.organization_id,
    );
    user.name = new_user.name;
    user.phone = new_user.phone;
    let user = store
        .users
        .create_unless(&user, same_email)
        .await
        .map_err(|e| email_taken(e, &email))?;

    if let Some(password) = new_user.password.filter(|p| !p.is_empty()) {
        store.set_credential(&user.id, hash_password(secret, &password)).await;
    }
    Ok(user)
}

/// Merge `patch` into a user. A new email must be valid and not used by
/// anyone else.
pub async fn update_user(store: &RecordStore, id: &str, patch: Map<String, Value>) -> DomainResult<User> {
    let email = match patch.get("email") {
        Some(Value::String(email)) => {
            if !is_valid_email(email) {
                return Err(DomainError::InvalidInput(format!("'{}' is not a valid email", email)));
            }
            Some(email.clone())
        }
        _ => None,
    };
    let updated = store.users.merge_unless(id, patch, same_email).await;
    match email {
        Some(email) => updated.map_err(|e| email_taken(e, &email)),
        None => updated,
    }
}

fn same_email(a: &User, b: &User) -> bool {
    a.email.trim().eq_ignore_ascii_case(b.email.trim())
}

fn email_taken(err: DomainError, email: &str) -> DomainError {
    match err {
        DomainError::Conflict(_) => {
            DomainError::Conflict(format!("a user with email {} already exists", email))
        }
        other => other,
    }
}

pub async fn sign_up(store: &RecordStore, secret: &str, new_user: NewUser) -> DomainResult<Session> {
    if new_user.password.as_deref().map_or(true, str::is_empty) {
        return Err(DomainError::InvalidInput("password is required".into()));
    }
    let user = register(store, secret, new_user).await?;
    Ok(Session {
        token: issue_token(secret, &user.id),
        user,
    })
}
