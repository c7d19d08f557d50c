//! PostgreSQL Repository Implementations
//!
//! Record lookups join through `accounts` so ownership is checked in SQL.

use auth::{AccountProvisioner, AuthResult};
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, RecordId, UserId};
use sqlx::PgPool;

use crate::domain::entity::{Account, GrowthRecord, NewAccount, NewGrowthRecord, RecordFields};
use crate::domain::repository::{AccountRepository, RecordRepository};
use crate::domain::value_object::{AccountName, Measurement, Memo};
use crate::error::GrowthResult;

const ACCOUNT_COLUMNS: &str = r#"
    id,
    user_id,
    name,
    birthday,
    icon,
    created_at
"#;

const RECORD_COLUMNS: &str = r#"
    r.id,
    r.account_id,
    r.date,
    r.height,
    r.weight,
    r.memo,
    r.photo,
    r.created_at,
    r.updated_at
"#;

/// PostgreSQL-backed growth repository
#[derive(Clone)]
pub struct PgGrowthRepository {
    pool: PgPool,
}

impl PgGrowthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgGrowthRepository {
    async fn create_account(&self, account: &NewAccount) -> GrowthResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (user_id, name, birthday, icon)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.user_id.get())
        .bind(account.name.as_str())
        .bind(account.birthday)
        .bind(account.icon.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_account())
    }

    async fn list_accounts(&self, user_id: UserId) -> GrowthResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AccountRow::into_account).collect())
    }

    async fn find_owned_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> GrowthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 AND user_id = $2"
        ))
        .bind(account_id.get())
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }
}

// ============================================================================
// Record Repository Implementation
// ============================================================================

impl RecordRepository for PgGrowthRepository {
    async fn create_record(&self, record: &NewGrowthRecord) -> GrowthResult<GrowthRecord> {
        let fields = &record.fields;
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            INSERT INTO growth_records AS r (account_id, date, height, weight, memo, photo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(record.account_id.get())
        .bind(fields.date)
        .bind(fields.height.value())
        .bind(fields.weight.value())
        .bind(fields.memo.as_str())
        .bind(fields.photo.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_record())
    }

    async fn list_records(&self, account_id: AccountId) -> GrowthResult<Vec<GrowthRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM growth_records r
            WHERE r.account_id = $1
            ORDER BY r.date DESC, r.id DESC
            "#
        ))
        .bind(account_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecordRow::into_record).collect())
    }

    async fn find_owned_record(
        &self,
        user_id: UserId,
        record_id: RecordId,
    ) -> GrowthResult<Option<GrowthRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM growth_records r
            JOIN accounts a ON a.id = r.account_id
            WHERE r.id = $1 AND a.user_id = $2
            "#
        ))
        .bind(record_id.get())
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RecordRow::into_record))
    }

    async fn update_record(
        &self,
        user_id: UserId,
        record_id: RecordId,
        fields: &RecordFields,
    ) -> GrowthResult<Option<GrowthRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            UPDATE growth_records AS r SET
                date = $3,
                height = $4,
                weight = $5,
                memo = $6,
                photo = $7,
                updated_at = NOW()
            FROM accounts a
            WHERE r.id = $1
              AND a.id = r.account_id
              AND a.user_id = $2
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(record_id.get())
        .bind(user_id.get())
        .bind(fields.date)
        .bind(fields.height.value())
        .bind(fields.weight.value())
        .bind(fields.memo.as_str())
        .bind(fields.photo.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RecordRow::into_record))
    }

    async fn delete_record(&self, user_id: UserId, record_id: RecordId) -> GrowthResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM growth_records r
            USING accounts a
            WHERE r.id = $1
              AND a.id = r.account_id
              AND a.user_id = $2
            "#,
        )
        .bind(record_id.get())
        .bind(user_id.get())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Default Account Provisioning
// ============================================================================

impl AccountProvisioner for PgGrowthRepository {
    async fn ensure_default_account(&self, user_id: UserId, name: &str) -> AuthResult<bool> {
        let name = AccountName::new(name)?;
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent first logins of the same user until commit
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(user_id.get())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (user_id, name)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM accounts WHERE user_id = $1)
            "#,
        )
        .bind(user_id.get())
        .bind(name.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    user_id: i64,
    name: String,
    birthday: Option<NaiveDate>,
    icon: Option<String>,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            account_id: AccountId::from_i64(self.id),
            user_id: UserId::from_i64(self.user_id),
            name: AccountName::from_db(self.name),
            birthday: self.birthday,
            icon: self.icon,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: i64,
    account_id: i64,
    date: NaiveDate,
    height: f64,
    weight: f64,
    memo: String,
    photo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecordRow {
    fn into_record(self) -> GrowthRecord {
        GrowthRecord {
            record_id: RecordId::from_i64(self.id),
            account_id: AccountId::from_i64(self.account_id),
            fields: RecordFields {
                date: self.date,
                height: Measurement::from_db(self.height),
                weight: Measurement::from_db(self.weight),
                memo: Memo::from_db(self.memo),
                photo: self.photo,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
