//! Delete Record Use Case

use std::sync::Arc;

use kernel::id::{RecordId, UserId};
use platform::upload::UploadStore;

use crate::application::attachment;
use crate::domain::repository::RecordRepository;
use crate::error::{GrowthError, GrowthResult};

/// Delete record use case
pub struct DeleteRecordUseCase<R>
where
    R: RecordRepository,
{
    repo: Arc<R>,
    uploads: Arc<UploadStore>,
}

impl<R> DeleteRecordUseCase<R>
where
    R: RecordRepository,
{
    pub fn new(repo: Arc<R>, uploads: Arc<UploadStore>) -> Self {
        Self { repo, uploads }
    }

    /// Delete the record and its photo file
    pub async fn execute(&self, user_id: UserId, record_id: RecordId) -> GrowthResult<()> {
        let record = self
            .repo
            .find_owned_record(user_id, record_id)
            .await?
            .ok_or(GrowthError::RecordNotFound)?;

        if !self.repo.delete_record(user_id, record_id).await? {
            return Err(GrowthError::RecordNotFound);
        }

        attachment::discard(&self.uploads, record.fields.photo.as_deref()).await;

        tracing::info!(
            user_id = %user_id,
            record_id = %record_id,
            "Growth record deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;
    use crate::domain::repository::RecordRepository;

    #[tokio::test]
    async fn test_delete_removes_row_and_photo() {
        let f = Fixture::new();
        let account = f.account(f.user, "taro").await;
        let (record_id, photo) = f.record_with_photo(account, "2024-01-01").await;

        DeleteRecordUseCase::new(f.repo(), f.uploads.clone())
            .execute(f.user, record_id)
            .await
            .unwrap();

        assert!(f.repo.find_owned_record(f.user, record_id).await.unwrap().is_none());
        assert!(!f.uploads.resolve(&photo).unwrap().exists());
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let f = Fixture::new();
        let account = f.account(f.user, "taro").await;
        let record_id = f.record(account, "2024-01-01").await;
        let use_case = DeleteRecordUseCase::new(f.repo(), f.uploads.clone());

        use_case.execute(f.user, record_id).await.unwrap();
        let again = use_case.execute(f.user, record_id).await;

        assert!(matches!(again, Err(GrowthError::RecordNotFound)));
    }

    #[tokio::test]
    async fn test_other_users_record_survives() {
        let f = Fixture::new();
        let account = f.account(f.user, "taro").await;
        let (record_id, photo) = f.record_with_photo(account, "2024-01-01").await;

        let result = DeleteRecordUseCase::new(f.repo(), f.uploads.clone())
            .execute(f.other_user, record_id)
            .await;

        assert!(matches!(result, Err(GrowthError::RecordNotFound)));
        assert!(f.repo.find_owned_record(f.user, record_id).await.unwrap().is_some());
        assert!(f.uploads.resolve(&photo).unwrap().exists());
    }
}
