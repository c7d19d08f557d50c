//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use auth::CurrentUser;
use kernel::id::{AccountId, RecordId};
use platform::multipart::{FormData, read_form};
use platform::upload::UploadStore;
use std::str::FromStr;
use std::sync::Arc;

use crate::application::config::GrowthConfig;
use crate::application::{
    CreateAccountInput, CreateAccountUseCase, CreateRecordInput, CreateRecordUseCase,
    DeleteRecordUseCase, ListAccountsUseCase, ListRecordsInput, ListRecordsUseCase, RecordInput,
    RecordList, UpdateRecordInput, UpdateRecordUseCase,
};
use crate::domain::repository::{AccountRepository, RecordRepository};
use crate::error::{GrowthError, GrowthResult};
use crate::presentation::dto::{AccountResponse, ListRecordsQuery, RecordResponse};

const TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
const PAGE_COUNT: HeaderName = HeaderName::from_static("x-page-count");

/// Shared state for growth handlers
#[derive(Clone)]
pub struct GrowthAppState<R>
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub uploads: Arc<UploadStore>,
    pub config: Arc<GrowthConfig>,
}

fn parse_id<T>(field: &str, raw: Option<&str>) -> GrowthResult<T>
where
    T: FromStr,
{
    let raw = raw.ok_or_else(|| GrowthError::Validation(format!("{field} is required")))?;
    raw.parse()
        .map_err(|_| GrowthError::Validation(format!("{field} must be a positive integer")))
}

fn record_input(form: &FormData) -> RecordInput {
    let text = |name: &str| form.text(name).unwrap_or_default().to_string();
    RecordInput {
        date: text("date"),
        height: text("height"),
        weight: text("weight"),
        memo: form.raw("memo").map(str::to_string),
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// GET /api/accounts
pub async fn list_accounts<R>(
    State(state): State<GrowthAppState<R>>,
    current: CurrentUser,
) -> GrowthResult<Json<Vec<AccountResponse>>>
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    let accounts = ListAccountsUseCase::new(state.repo.clone())
        .execute(current.user_id)
        .await?;

    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// POST /api/accounts (multipart: name, birthday?, icon?)
pub async fn create_account<R>(
    State(state): State<GrowthAppState<R>>,
    current: CurrentUser,
    multipart: Multipart,
) -> GrowthResult<(StatusCode, Json<AccountResponse>)>
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    let mut form = read_form(multipart, "icon").await?;

    let input = CreateAccountInput {
        name: form.text("name").unwrap_or_default().to_string(),
        birthday: form.text("birthday").map(str::to_string),
        icon: form.take_file(),
    };

    let account = CreateAccountUseCase::new(state.repo.clone(), state.uploads.clone())
        .execute(current.user_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

// ============================================================================
// Records
// ============================================================================

/// GET /api/records/{account_id}?page=&perPage=
///
/// Paged responses carry `X-Total-Count` and `X-Page-Count`.
pub async fn list_records<R>(
    State(state): State<GrowthAppState<R>>,
    current: CurrentUser,
    Path(account_id): Path<String>,
    query: Result<Query<ListRecordsQuery>, QueryRejection>,
) -> GrowthResult<Response>
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    let account_id: AccountId = parse_id("accountId", Some(&account_id))?;
    let Query(query) = query.map_err(|rejection| GrowthError::Validation(rejection.body_text()))?;

    let list = ListRecordsUseCase::new(state.repo.clone(), state.config.clone())
        .execute(
            current.user_id,
            ListRecordsInput {
                account_id,
                page: query.page,
                per_page: query.per_page,
            },
        )
        .await?;

    let body: Vec<RecordResponse> = list.records().iter().map(RecordResponse::from).collect();

    let mut headers = HeaderMap::new();
    if let RecordList::Paged(page) = &list {
        headers.insert(TOTAL_COUNT, HeaderValue::from(page.total));
        headers.insert(PAGE_COUNT, HeaderValue::from(page.page_count));
    }

    Ok((headers, Json(body)).into_response())
}

/// POST /api/records (multipart: accountId, date, height, weight, memo?, photo?)
pub async fn create_record<R>(
    State(state): State<GrowthAppState<R>>,
    current: CurrentUser,
    multipart: Multipart,
) -> GrowthResult<(StatusCode, Json<RecordResponse>)>
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    let mut form = read_form(multipart, "photo").await?;

    let input = CreateRecordInput {
        account_id: parse_id("accountId", form.text("accountId"))?,
        fields: record_input(&form),
        photo: form.take_file(),
    };

    let record = CreateRecordUseCase::new(state.repo.clone(), state.uploads.clone())
        .execute(current.user_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(RecordResponse::from(&record))))
}

/// PUT /api/records/{id} (multipart: date, height, weight, memo?, photo?, existingPhoto?)
pub async fn update_record<R>(
    State(state): State<GrowthAppState<R>>,
    current: CurrentUser,
    Path(record_id): Path<String>,
    multipart: Multipart,
) -> GrowthResult<Json<RecordResponse>>
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    let record_id: RecordId = parse_id("id", Some(&record_id))?;
    let mut form = read_form(multipart, "photo").await?;

    let input = UpdateRecordInput {
        fields: record_input(&form),
        existing_photo: form.text("existingPhoto").map(str::to_string),
        photo: form.take_file(),
    };

    let record = UpdateRecordUseCase::new(state.repo.clone(), state.uploads.clone())
        .execute(current.user_id, record_id, input)
        .await?;

    Ok(Json(RecordResponse::from(&record)))
}

/// DELETE /api/records/{id}
pub async fn delete_record<R>(
    State(state): State<GrowthAppState<R>>,
    current: CurrentUser,
    Path(record_id): Path<String>,
) -> GrowthResult<StatusCode>
where
    R: AccountRepository + RecordRepository + Clone + Send + Sync + 'static,
{
    let record_id: RecordId = parse_id("id", Some(&record_id))?;

    DeleteRecordUseCase::new(state.repo.clone(), state.uploads.clone())
        .execute(current.user_id, record_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
