//! API DTOs (Data Transfer Objects)

use chrono::NaiveDate;
use kernel::id::{AccountId, RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{Account, GrowthRecord};

// ============================================================================
// Accounts
// ============================================================================

/// Account response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub user_id: UserId,
    pub name: String,
    pub birthday: Option<NaiveDate>,
    pub icon: Option<String>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id,
            user_id: account.user_id,
            name: account.name.as_str().to_string(),
            birthday: account.birthday,
            icon: account.icon.clone(),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Growth record response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: RecordId,
    pub account_id: AccountId,
    pub date: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub memo: String,
    pub photo: Option<String>,
}

impl From<&GrowthRecord> for RecordResponse {
    fn from(record: &GrowthRecord) -> Self {
        Self {
            id: record.record_id,
            account_id: record.account_id,
            date: record.fields.date,
            height: record.fields.height.value(),
            weight: record.fields.weight.value(),
            memo: record.fields.memo.as_str().to_string(),
            photo: record.fields.photo.clone(),
        }
    }
}

/// Query string of `GET /api/records/{account_id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::RecordFields;
    use crate::domain::value_object::{Measurement, Memo};
    use chrono::Utc;

    #[test]
    fn test_record_response_shape() {
        let record = GrowthRecord {
            record_id: RecordId::from_i64(3),
            account_id: AccountId::from_i64(2),
            fields: RecordFields {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                height: Measurement::from_db(98.5),
                weight: Measurement::from_db(15.0),
                memo: Memo::from_db(String::new()),
                photo: None,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(RecordResponse::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "accountId": 2,
                "date": "2024-05-01",
                "height": 98.5,
                "weight": 15.0,
                "memo": "",
                "photo": null
            })
        );
    }

    #[test]
    fn test_query_uses_camel_case() {
        let query: ListRecordsQuery =
            serde_json::from_value(serde_json::json!({ "page": 2, "perPage": 5 })).unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, Some(5));
    }
}
