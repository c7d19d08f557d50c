//! List Records Use Case

use std::sync::Arc;

use kernel::id::{AccountId, UserId};

use crate::application::config::GrowthConfig;
use crate::domain::entity::GrowthRecord;
use crate::domain::pagination::{Page, PageRequest, paginate};
use crate::domain::repository::{AccountRepository, RecordRepository};
use crate::error::{GrowthError, GrowthResult};

/// List records input
pub struct ListRecordsInput {
    pub account_id: AccountId,
    /// 1-based page; `None` returns every record
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Records of one account, either complete or one page of them
pub enum RecordList {
    All(Vec<GrowthRecord>),
    Paged(Page<GrowthRecord>),
}

impl RecordList {
    pub fn records(&self) -> &[GrowthRecord] {
        match self {
            RecordList::All(records) => records,
            RecordList::Paged(page) => &page.items,
        }
    }
}

/// List records use case
pub struct ListRecordsUseCase<R>
where
    R: AccountRepository + RecordRepository,
{
    repo: Arc<R>,
    config: Arc<GrowthConfig>,
}

impl<R> ListRecordsUseCase<R>
where
    R: AccountRepository + RecordRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<GrowthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, user_id: UserId, input: ListRecordsInput) -> GrowthResult<RecordList> {
        let page_request = input
            .page
            .map(|page| {
                PageRequest::new(
                    page,
                    input.per_page,
                    self.config.default_page_size,
                    self.config.max_page_size,
                )
            })
            .transpose()?;

        self.repo
            .find_owned_account(user_id, input.account_id)
            .await?
            .ok_or(GrowthError::AccountNotFound)?;

        let records = self.repo.list_records(input.account_id).await?;

        Ok(match page_request {
            Some(request) => RecordList::Paged(paginate(records, request)),
            None => RecordList::All(records),
        })
    }
}
