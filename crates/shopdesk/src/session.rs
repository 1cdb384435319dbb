//! # Session Context
//!
//! An explicit session object that remembers who is signed in and persists
//! that fact in a client-side key/value store, so a restarted client restores
//! the session without asking for credentials again.
//!
//! Credentials are never checked here. An [`IdentityProvider`] verifies them
//! and returns the account to remember.

use crate::model::{Role, User, UserId};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{info, instrument, warn};

pub const AUTHENTICATED_KEY: &str = "session.authenticated";
pub const USER_KEY: &str = "session.user";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Session storage failed: {0}")]
    Storage(String),
    #[error("Session data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The signed-in account as remembered by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

// --- Persistence ---

/// Persisted string key/value storage on the client.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: String) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<K> {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        (**self).remove(key)
    }
}

// --- Identity ---

/// Verifies credentials on behalf of the client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<SessionUser, SessionError>;
}

const SALT_LEN: usize = 16;

struct Account {
    user: SessionUser,
    active: bool,
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Identity provider holding salted SHA-256 password digests in memory.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the credentials of `user`.
    pub fn register(&self, user: &User, password: &str) {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill(&mut salt);
        let account = Account {
            user: SessionUser::from(user),
            active: user.active,
            salt,
            digest: digest(&salt, password),
        };
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        accounts.insert(user.email.to_lowercase(), account);
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn authenticate(&self, email: &str, password: &str) -> Result<SessionUser, SessionError> {
        let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        match accounts.get(&email.to_lowercase()) {
            Some(account) if account.active && digest(&account.salt, password) == account.digest => {
                Ok(account.user.clone())
            }
            _ => Err(SessionError::InvalidCredentials),
        }
    }
}

// --- Session ---

/// Who is signed in, backed by a [`KeyValueStore`].
pub struct Session<K: KeyValueStore> {
    storage: K,
    user: Option<SessionUser>,
}

impl<K: KeyValueStore> Session<K> {
    /// A signed-out session. Nothing is read from `storage`.
    pub fn new(storage: K) -> Self {
        Self { storage, user: None }
    }

    /// Rebuilds the session from what `storage` remembers.
    ///
    /// Missing keys mean signed out. A user entry without the authenticated
    /// flag is ignored.
    pub fn restore(storage: K) -> Result<Self, SessionError> {
        let authenticated = storage.get(AUTHENTICATED_KEY)?.as_deref() == Some("true");
        let user = match storage.get(USER_KEY)? {
            Some(raw) if authenticated => Some(serde_json::from_str::<SessionUser>(&raw)?),
            _ => None,
        };
        if let Some(user) = &user {
            info!(user_id = %user.id, "Session restored");
        }
        Ok(Self { storage, user })
    }

    #[instrument(skip(self, provider, password))]
    pub async fn sign_in(
        &mut self,
        provider: &dyn IdentityProvider,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, SessionError> {
        let user = match provider.authenticate(email, password).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Sign-in rejected");
                return Err(e);
            }
        };
        self.storage.set(USER_KEY, serde_json::to_string(&user)?)?;
        self.storage.set(AUTHENTICATED_KEY, "true".to_string())?;
        info!(user_id = %user.id, "Signed in");
        self.user = Some(user.clone());
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        self.storage.remove(USER_KEY)?;
        self.storage.remove(AUTHENTICATED_KEY)?;
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    pub fn into_storage(self) -> K {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserCreate;
    use resource_framework::Resource;
    use std::sync::Arc;

    fn ana(active: bool) -> User {
        let mut user = User::from_create(
            UserId(1),
            UserCreate {
                name: "Ana".into(),
                email: "ana@shop.test".into(),
                role: Role::Admin,
            },
        )
        .unwrap();
        user.active = active;
        user
    }

    fn provider(user: &User) -> InMemoryIdentityProvider {
        let provider = InMemoryIdentityProvider::new();
        provider.register(user, "s3cret");
        provider
    }

    #[tokio::test]
    async fn sign_in_persists_and_restores() {
        let provider = provider(&ana(true));
        let storage = Arc::new(MemoryKeyValueStore::new());
        let mut session = Session::new(storage.clone());

        let user = session.sign_in(&provider, "ANA@shop.test", "s3cret").await.unwrap();
        assert_eq!(user.id, UserId(1));
        assert!(session.is_authenticated());
        assert_eq!(storage.get(AUTHENTICATED_KEY).unwrap().as_deref(), Some("true"));

        let restored = Session::restore(storage).unwrap();
        assert_eq!(restored.current(), Some(&user));
    }

    #[tokio::test]
    async fn wrong_password_leaves_session_signed_out() {
        let provider = provider(&ana(true));
        let mut session = Session::new(MemoryKeyValueStore::new());

        let err = session.sign_in(&provider, "ana@shop.test", "guess").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn inactive_accounts_cannot_sign_in() {
        let provider = provider(&ana(false));
        let mut session = Session::new(MemoryKeyValueStore::new());
        assert!(session.sign_in(&provider, "ana@shop.test", "s3cret").await.is_err());
    }

    #[tokio::test]
    async fn sign_out_clears_storage() {
        let provider = provider(&ana(true));
        let mut session = Session::new(MemoryKeyValueStore::new());
        session.sign_in(&provider, "ana@shop.test", "s3cret").await.unwrap();

        session.sign_out().unwrap();
        assert!(session.current().is_none());
        let restored = Session::restore(session.into_storage()).unwrap();
        assert!(!restored.is_authenticated());
    }

    #[test]
    fn same_password_gets_different_digests() {
        let provider = InMemoryIdentityProvider::new();
        let mut other = ana(true);
        other.email = "bo@shop.test".into();
        provider.register(&ana(true), "s3cret");
        provider.register(&other, "s3cret");

        let accounts = provider.accounts.lock().unwrap();
        let a = &accounts["ana@shop.test"];
        let b = &accounts["bo@shop.test"];
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn corrupt_user_entry_is_a_serialization_error() {
        let storage = MemoryKeyValueStore::new();
        storage.set(AUTHENTICATED_KEY, "true".into()).unwrap();
        storage.set(USER_KEY, "{not json".into()).unwrap();
        assert!(matches!(
            Session::restore(storage),
            Err(SessionError::Serialization(_))
        ));
    }
}
