//! Create Record Use Case

use std::sync::Arc;

use kernel::id::{AccountId, UserId};
use platform::multipart::UploadedFile;
use platform::upload::UploadStore;

use crate::application::attachment;
use crate::application::record_input::RecordInput;
use crate::domain::entity::{GrowthRecord, NewGrowthRecord};
use crate::domain::repository::{AccountRepository, RecordRepository};
use crate::error::{GrowthError, GrowthResult};

/// Create record input
pub struct CreateRecordInput {
    pub account_id: AccountId,
    pub fields: RecordInput,
    pub photo: Option<UploadedFile>,
}

/// Create record use case
pub struct CreateRecordUseCase<R>
where
    R: AccountRepository + RecordRepository,
{
    repo: Arc<R>,
    uploads: Arc<UploadStore>,
}

impl<R> CreateRecordUseCase<R>
where
    R: AccountRepository + RecordRepository,
{
    pub fn new(repo: Arc<R>, uploads: Arc<UploadStore>) -> Self {
        Self { repo, uploads }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        input: CreateRecordInput,
    ) -> GrowthResult<GrowthRecord> {
        self.repo
            .find_owned_account(user_id, input.account_id)
            .await?
            .ok_or(GrowthError::AccountNotFound)?;

        let mut fields = input.fields.validate(None)?;
        fields.photo = attachment::store(&self.uploads, input.photo.as_ref()).await?;

        let new_record = NewGrowthRecord {
            account_id: input.account_id,
            fields,
        };

        let record = match self.repo.create_record(&new_record).await {
            Ok(record) => record,
            Err(e) => {
                attachment::discard(&self.uploads, new_record.fields.photo.as_deref()).await;
                return Err(e);
            }
        };

        tracing::info!(
            user_id = %user_id,
            account_id = %record.account_id,
            record_id = %record.record_id,
            "Growth record created"
        );

        Ok(record)
    }
}
