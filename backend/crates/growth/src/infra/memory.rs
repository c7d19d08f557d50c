//! In-Memory Repository
//!
//! Same ownership and ordering semantics as the PostgreSQL queries.
//! Used by tests and for running without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use auth::{AccountProvisioner, AuthResult};
use chrono::Utc;
use kernel::id::{AccountId, RecordId, UserId};

use crate::domain::entity::{Account, GrowthRecord, NewAccount, NewGrowthRecord, RecordFields};
use crate::domain::repository::{AccountRepository, RecordRepository};
use crate::domain::value_object::AccountName;
use crate::error::{GrowthError, GrowthResult};

#[derive(Default)]
struct State {
    next_account_id: i64,
    next_record_id: i64,
    accounts: Vec<Account>,
    records: Vec<GrowthRecord>,
}

impl State {
    fn owns(&self, user_id: UserId, account_id: AccountId) -> bool {
        self.accounts
            .iter()
            .any(|a| a.account_id == account_id && a.user_id == user_id)
    }

    fn insert_account(&mut self, account: &NewAccount) -> Account {
        self.next_account_id += 1;
        let created = Account {
            account_id: AccountId::from_i64(self.next_account_id),
            user_id: account.user_id,
            name: account.name.clone(),
            birthday: account.birthday,
            icon: account.icon.clone(),
            created_at: Utc::now(),
        };
        self.accounts.push(created.clone());
        created
    }
}

/// In-memory growth repository; clones share state
#[derive(Clone, Default)]
pub struct InMemoryGrowthRepository {
    state: Arc<Mutex<State>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryGrowthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with `GrowthError::Internal`
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> GrowthResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GrowthError::Internal("write failure injected".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for InMemoryGrowthRepository {
    async fn create_account(&self, account: &NewAccount) -> GrowthResult<Account> {
        self.write_guard()?;
        Ok(self.lock().insert_account(account))
    }

    async fn list_accounts(&self, user_id: UserId) -> GrowthResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .lock()
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.account_id);
        Ok(accounts)
    }

    async fn find_owned_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> GrowthResult<Option<Account>> {
        Ok(self
            .lock()
            .accounts
            .iter()
            .find(|a| a.account_id == account_id && a.user_id == user_id)
            .cloned())
    }
}

// ============================================================================
// Record Repository Implementation
// ============================================================================

impl RecordRepository for InMemoryGrowthRepository {
    async fn create_record(&self, record: &NewGrowthRecord) -> GrowthResult<GrowthRecord> {
        self.write_guard()?;
        let mut state = self.lock();

        state.next_record_id += 1;
        let now = Utc::now();
        let created = GrowthRecord {
            record_id: RecordId::from_i64(state.next_record_id),
            account_id: record.account_id,
            fields: record.fields.clone(),
            created_at: now,
            updated_at: now,
        };
        state.records.push(created.clone());

        Ok(created)
    }

    async fn list_records(&self, account_id: AccountId) -> GrowthResult<Vec<GrowthRecord>> {
        let mut records: Vec<GrowthRecord> = self
            .lock()
            .records
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.fields
                .date
                .cmp(&a.fields.date)
                .then(b.record_id.cmp(&a.record_id))
        });
        Ok(records)
    }

    async fn find_owned_record(
        &self,
        user_id: UserId,
        record_id: RecordId,
    ) -> GrowthResult<Option<GrowthRecord>> {
        let state = self.lock();
        Ok(state
            .records
            .iter()
            .find(|r| r.record_id == record_id && state.owns(user_id, r.account_id))
            .cloned())
    }

    async fn update_record(
        &self,
        user_id: UserId,
        record_id: RecordId,
        fields: &RecordFields,
    ) -> GrowthResult<Option<GrowthRecord>> {
        self.write_guard()?;
        let mut state = self.lock();

        let Some(index) = state
            .records
            .iter()
            .position(|r| r.record_id == record_id && state.owns(user_id, r.account_id))
        else {
            return Ok(None);
        };

        let record = &mut state.records[index];
        record.fields = fields.clone();
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn delete_record(&self, user_id: UserId, record_id: RecordId) -> GrowthResult<bool> {
        self.write_guard()?;
        let mut state = self.lock();

        let Some(index) = state
            .records
            .iter()
            .position(|r| r.record_id == record_id && state.owns(user_id, r.account_id))
        else {
            return Ok(false);
        };
        state.records.remove(index);

        Ok(true)
    }
}

// ============================================================================
// Default Account Provisioning
// ============================================================================

impl AccountProvisioner for InMemoryGrowthRepository {
    async fn ensure_default_account(&self, user_id: UserId, name: &str) -> AuthResult<bool> {
        self.write_guard()?;
        let name = AccountName::new(name)?;
        let mut state = self.lock();

        if state.accounts.iter().any(|a| a.user_id == user_id) {
            return Ok(false);
        }
        state.insert_account(&NewAccount {
            user_id,
            name,
            birthday: None,
            icon: None,
        });

        Ok(true)
    }
}
