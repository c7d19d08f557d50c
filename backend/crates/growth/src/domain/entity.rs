//! Entities
//!
//! Ownership chain: User → Account → GrowthRecord, each one-to-many.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, RecordId, UserId};

use crate::domain::value_object::{AccountName, Measurement, Memo};

/// A child profile owned by a user
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub user_id: UserId,
    pub name: AccountName,
    pub birthday: Option<NaiveDate>,
    /// URL path of the uploaded icon
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated account data, before an id is assigned
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: UserId,
    pub name: AccountName,
    pub birthday: Option<NaiveDate>,
    pub icon: Option<String>,
}

/// One dated measurement entry under an account
#[derive(Debug, Clone)]
pub struct GrowthRecord {
    pub record_id: RecordId,
    pub account_id: AccountId,
    pub fields: RecordFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The editable part of a record, shared by create and update
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    pub date: NaiveDate,
    /// Height in cm
    pub height: Measurement,
    /// Weight in kg
    pub weight: Measurement,
    pub memo: Memo,
    /// URL path of the uploaded photo
    pub photo: Option<String>,
}

/// Validated record data, before an id is assigned
#[derive(Debug, Clone)]
pub struct NewGrowthRecord {
    pub account_id: AccountId,
    pub fields: RecordFields,
}
