//! Update Record Use Case
//!
//! Photo handling:
//! - new file → stored, replaces the photo, old file removed
//! - `existing_photo` equal to the current path → photo kept
//! - `existing_photo` naming any other path → validation error
//! - neither → photo cleared, old file removed

use std::sync::Arc;

use kernel::id::{RecordId, UserId};
use platform::multipart::UploadedFile;
use platform::upload::UploadStore;

use crate::application::attachment;
use crate::application::record_input::RecordInput;
use crate::domain::entity::GrowthRecord;
use crate::domain::repository::RecordRepository;
use crate::error::{GrowthError, GrowthResult};

/// Update record input
pub struct UpdateRecordInput {
    pub fields: RecordInput,
    pub photo: Option<UploadedFile>,
    /// Path of the photo the client wants to keep
    pub existing_photo: Option<String>,
}

/// Update record use case
pub struct UpdateRecordUseCase<R>
where
    R: RecordRepository,
{
    repo: Arc<R>,
    uploads: Arc<UploadStore>,
}

impl<R> UpdateRecordUseCase<R>
where
    R: RecordRepository,
{
    pub fn new(repo: Arc<R>, uploads: Arc<UploadStore>) -> Self {
        Self { repo, uploads }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        record_id: RecordId,
        input: UpdateRecordInput,
    ) -> GrowthResult<GrowthRecord> {
        let current = self
            .repo
            .find_owned_record(user_id, record_id)
            .await?
            .ok_or(GrowthError::RecordNotFound)?;
        let current_photo = current.fields.photo;

        let mut fields = input.fields.validate(None)?;

        let keeps_foreign_photo = input.photo.is_none()
            && input
                .existing_photo
                .as_deref()
                .is_some_and(|existing| current_photo.as_deref() != Some(existing));
        if keeps_foreign_photo {
            return Err(GrowthError::Validation(
                "existingPhoto does not match the record's photo".to_string(),
            ));
        }

        let new_photo = attachment::store(&self.uploads, input.photo.as_ref()).await?;
        fields.photo = match (&new_photo, &input.existing_photo) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(_)) => current_photo.clone(),
            (None, None) => None,
        };

        let updated = match self.repo.update_record(user_id, record_id, &fields).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                attachment::discard(&self.uploads, new_photo.as_deref()).await;
                return Err(GrowthError::RecordNotFound);
            }
            Err(e) => {
                attachment::discard(&self.uploads, new_photo.as_deref()).await;
                return Err(e);
            }
        };

        if current_photo != updated.fields.photo {
            attachment::discard(&self.uploads, current_photo.as_deref()).await;
        }

        tracing::info!(
            user_id = %user_id,
            record_id = %record_id,
            "Growth record updated"
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    struct Setup {
        f: Fixture,
        record_id: RecordId,
        photo: String,
    }

    async fn setup() -> Setup {
        let f = Fixture::new();
        let account = f.account(f.user, "taro").await;
        let (record_id, photo) = f.record_with_photo(account, "2024-01-01").await;
        Setup { f, record_id, photo }
    }

    fn input(photo: Option<UploadedFile>, existing_photo: Option<&str>) -> UpdateRecordInput {
        UpdateRecordInput {
            fields: Fixture::fields("2024-02-01", "100.1", "16", Some("taller")),
            photo,
            existing_photo: existing_photo.map(str::to_string),
        }
    }

    fn use_case(f: &Fixture) -> UpdateRecordUseCase<crate::infra::memory::InMemoryGrowthRepository> {
        UpdateRecordUseCase::new(f.repo(), f.uploads.clone())
    }

    #[tokio::test]
    async fn test_keep_existing_photo() {
        let s = setup().await;

        let updated = use_case(&s.f)
            .execute(s.f.user, s.record_id, input(None, Some(&s.photo)))
            .await
            .unwrap();

        assert_eq!(updated.fields.photo.as_deref(), Some(s.photo.as_str()));
        assert_eq!(updated.fields.memo.as_str(), "taller");
        assert_eq!(updated.fields.date.to_string(), "2024-02-01");
        assert!(s.f.uploads.resolve(&s.photo).unwrap().exists());
    }

    #[tokio::test]
    async fn test_replace_photo_removes_old_file() {
        let s = setup().await;

        let updated = use_case(&s.f)
            .execute(
                s.f.user,
                s.record_id,
                input(Fixture::image("new.webp"), Some(&s.photo)),
            )
            .await
            .unwrap();

        let new_photo = updated.fields.photo.unwrap();
        assert_ne!(new_photo, s.photo);
        assert!(new_photo.ends_with(".webp"));
        assert!(!s.f.uploads.resolve(&s.photo).unwrap().exists());
        assert_eq!(s.f.stored_files(), 1);
    }

    #[tokio::test]
    async fn test_neither_clears_photo() {
        let s = setup().await;

        let updated = use_case(&s.f)
            .execute(s.f.user, s.record_id, input(None, None))
            .await
            .unwrap();

        assert!(updated.fields.photo.is_none());
        assert_eq!(s.f.stored_files(), 0);
    }

    #[tokio::test]
    async fn test_foreign_existing_photo_is_rejected() {
        let s = setup().await;

        let result = use_case(&s.f)
            .execute(
                s.f.user,
                s.record_id,
                input(None, Some("/uploads/someone-elses.png")),
            )
            .await;

        assert!(matches!(result, Err(GrowthError::Validation(_))));
        assert!(s.f.uploads.resolve(&s.photo).unwrap().exists());
    }

    #[tokio::test]
    async fn test_other_users_record_is_not_found() {
        let s = setup().await;

        let result = use_case(&s.f)
            .execute(s.f.other_user, s.record_id, input(None, None))
            .await;

        assert!(matches!(result, Err(GrowthError::RecordNotFound)));
        assert!(s.f.uploads.resolve(&s.photo).unwrap().exists());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_old_photo_and_drops_new() {
        let s = setup().await;
        s.f.repo.fail_writes(true);

        let result = use_case(&s.f)
            .execute(
                s.f.user,
                s.record_id,
                input(Fixture::image("new.png"), None),
            )
            .await;

        assert!(matches!(result, Err(GrowthError::Internal(_))));
        assert!(s.f.uploads.resolve(&s.photo).unwrap().exists());
        assert_eq!(s.f.stored_files(), 1);
    }
}
