//! In-Memory Repository
//!
//! Process-local store with the same uniqueness semantics as the
//! PostgreSQL schema. Used by tests and for running without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::entity::{NewUser, ProfileChanges, User};
use crate::domain::repository::{AccountProvisioner, UserRepository};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
    /// Default accounts handed out by `ensure_default_account`
    accounts: HashMap<UserId, Vec<String>>,
}

/// In-memory auth repository; clones share state
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Account names provisioned for `user_id`
    pub fn provisioned_accounts(&self, user_id: UserId) -> Vec<String> {
        self.lock()
            .accounts
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl State {
    fn name_taken(&self, user_name: &UserName, excluding: Option<UserId>) -> bool {
        self.users.iter().any(|u| {
            Some(u.user_id) != excluding && u.user_name.canonical() == user_name.canonical()
        })
    }

    fn email_taken(&self, email: &Email, excluding: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.user_id) != excluding && u.email == *email)
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut state = self.lock();

        if state.name_taken(&user.user_name, None) {
            return Err(AuthError::UserNameTaken);
        }
        if state.email_taken(&user.email, None) {
            return Err(AuthError::EmailTaken);
        }

        state.next_id += 1;
        let now = Utc::now();
        let created = User {
            user_id: UserId::from_i64(state.next_id),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.user_name.canonical() == user_name.canonical())
            .cloned())
    }

    async fn exists_by_user_name(
        &self,
        user_name: &UserName,
        excluding: Option<UserId>,
    ) -> AuthResult<bool> {
        Ok(self.lock().name_taken(user_name, excluding))
    }

    async fn exists_by_email(&self, email: &Email, excluding: Option<UserId>) -> AuthResult<bool> {
        Ok(self.lock().email_taken(email, excluding))
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
    ) -> AuthResult<Option<User>> {
        let mut state = self.lock();

        if state.name_taken(&changes.user_name, Some(user_id)) {
            return Err(AuthError::UserNameTaken);
        }
        if state.email_taken(&changes.email, Some(user_id)) {
            return Err(AuthError::EmailTaken);
        }

        let Some(user) = state.users.iter_mut().find(|u| u.user_id == user_id) else {
            return Ok(None);
        };
        user.apply(changes.clone());

        Ok(Some(user.clone()))
    }
}

impl AccountProvisioner for InMemoryAuthRepository {
    async fn ensure_default_account(&self, user_id: UserId, name: &str) -> AuthResult<bool> {
        let mut state = self.lock();
        let accounts = state.accounts.entry(user_id).or_default();
        if !accounts.is_empty() {
            return Ok(false);
        }
        accounts.push(name.to_string());
        Ok(true)
    }
}
