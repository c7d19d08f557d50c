//! Shared fixture for use case tests

use std::sync::Arc;

use kernel::id::{AccountId, RecordId, UserId};
use platform::multipart::UploadedFile;
use platform::upload::UploadStore;
use tempfile::TempDir;

use crate::application::record_input::RecordInput;
use crate::domain::entity::{NewAccount, NewGrowthRecord};
use crate::domain::repository::{AccountRepository, RecordRepository};
use crate::domain::value_object::AccountName;
use crate::infra::memory::InMemoryGrowthRepository;

pub(crate) struct Fixture {
    pub repo: Arc<InMemoryGrowthRepository>,
    pub uploads: Arc<UploadStore>,
    pub user: UserId,
    pub other_user: UserId,
    _dir: TempDir,
}

impl Fixture {
    /// Minimal PNG signature; content is never decoded
    pub const IMAGE_BYTES: &'static [u8] = b"\x89PNG\r\n\x1a\nfixture";

    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::new(dir.path().join("uploads"));
        Self {
            repo: Arc::new(InMemoryGrowthRepository::new()),
            uploads: Arc::new(uploads),
            user: UserId::from_i64(1),
            other_user: UserId::from_i64(2),
            _dir: dir,
        }
    }

    pub fn repo(&self) -> Arc<InMemoryGrowthRepository> {
        self.repo.clone()
    }

    pub async fn account(&self, user_id: UserId, name: &str) -> AccountId {
        self.repo
            .create_account(&NewAccount {
                user_id,
                name: AccountName::new(name).unwrap(),
                birthday: None,
                icon: None,
            })
            .await
            .unwrap()
            .account_id
    }

    pub async fn record(&self, account_id: AccountId, date: &str) -> RecordId {
        self.insert_record(account_id, date, None).await
    }

    /// Record whose photo is an actual stored file
    pub async fn record_with_photo(&self, account_id: AccountId, date: &str) -> (RecordId, String) {
        let photo = self
            .uploads
            .save("photo.png", Self::IMAGE_BYTES)
            .await
            .unwrap();
        let id = self.insert_record(account_id, date, Some(photo.clone())).await;
        (id, photo)
    }

    async fn insert_record(
        &self,
        account_id: AccountId,
        date: &str,
        photo: Option<String>,
    ) -> RecordId {
        let fields = Self::fields(date, "90", "13", None).validate(photo).unwrap();
        self.repo
            .create_record(&NewGrowthRecord { account_id, fields })
            .await
            .unwrap()
            .record_id
    }

    pub fn fields(date: &str, height: &str, weight: &str, memo: Option<&str>) -> RecordInput {
        RecordInput {
            date: date.to_string(),
            height: height.to_string(),
            weight: weight.to_string(),
            memo: memo.map(str::to_string),
        }
    }

    pub fn image(file_name: &str) -> Option<UploadedFile> {
        Some(UploadedFile {
            file_name: file_name.to_string(),
            bytes: Self::IMAGE_BYTES.to_vec(),
        })
    }

    /// Number of files currently in the upload directory
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.uploads.root())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
