//! Application Layer
//!
//! Use cases for accounts and growth records.

mod attachment;
pub mod config;
pub mod create_account;
pub mod create_record;
pub mod delete_record;
pub mod list_accounts;
pub mod list_records;
pub mod record_input;
pub mod update_record;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use config::GrowthConfig;
pub use create_account::{CreateAccountInput, CreateAccountUseCase};
pub use create_record::{CreateRecordInput, CreateRecordUseCase};
pub use delete_record::DeleteRecordUseCase;
pub use list_accounts::ListAccountsUseCase;
pub use list_records::{ListRecordsInput, ListRecordsUseCase, RecordList};
pub use record_input::RecordInput;
pub use update_record::{UpdateRecordInput, UpdateRecordUseCase};
