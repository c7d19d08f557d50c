//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Lookups take the caller's `UserId` so ownership is part of every query.

use kernel::id::{AccountId, RecordId, UserId};

use crate::domain::entity::{Account, GrowthRecord, NewAccount, NewGrowthRecord, RecordFields};
use crate::error::GrowthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account and return it with its assigned id
    async fn create_account(&self, account: &NewAccount) -> GrowthResult<Account>;

    /// All accounts owned by the user, ordered by id
    async fn list_accounts(&self, user_id: UserId) -> GrowthResult<Vec<Account>>;

    /// The account if it exists and belongs to `user_id`
    async fn find_owned_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> GrowthResult<Option<Account>>;
}

/// Growth record repository trait
#[trait_variant::make(RecordRepository: Send)]
pub trait LocalRecordRepository {
    /// Insert a new record and return it with its assigned id
    async fn create_record(&self, record: &NewGrowthRecord) -> GrowthResult<GrowthRecord>;

    /// All records of an account, newest date first (ties: newest id first)
    async fn list_records(&self, account_id: AccountId) -> GrowthResult<Vec<GrowthRecord>>;

    /// The record if its account belongs to `user_id`
    async fn find_owned_record(
        &self,
        user_id: UserId,
        record_id: RecordId,
    ) -> GrowthResult<Option<GrowthRecord>>;

    /// Replace the editable fields; `None` if not found or not owned
    async fn update_record(
        &self,
        user_id: UserId,
        record_id: RecordId,
        fields: &RecordFields,
    ) -> GrowthResult<Option<GrowthRecord>>;

    /// Delete; `false` if not found or not owned
    async fn delete_record(&self, user_id: UserId, record_id: RecordId) -> GrowthResult<bool>;
}
