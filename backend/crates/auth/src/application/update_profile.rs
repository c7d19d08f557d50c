//! Update Profile Use Case
//!
//! Replaces user name and email, and optionally the avatar image.

use std::sync::Arc;

use kernel::id::UserId;
use platform::multipart::UploadedFile;
use platform::upload::UploadStore;

use crate::domain::entity::{ProfileChanges, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Update profile input
pub struct UpdateProfileInput {
    pub user_name: String,
    pub email: String,
    /// New avatar; `None` keeps the current one
    pub avatar: Option<UploadedFile>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    uploads: Arc<UploadStore>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, uploads: Arc<UploadStore>) -> Self {
        Self { user_repo, uploads }
    }

    pub async fn execute(&self, user_id: UserId, input: UpdateProfileInput) -> AuthResult<User> {
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(&input.email)?;

        let current = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if self
            .user_repo
            .exists_by_user_name(&user_name, Some(user_id))
            .await?
        {
            return Err(AuthError::UserNameTaken);
        }
        if self.user_repo.exists_by_email(&email, Some(user_id)).await? {
            return Err(AuthError::EmailTaken);
        }

        let new_avatar = match &input.avatar {
            Some(file) => Some(self.uploads.save(&file.file_name, &file.bytes).await?),
            None => None,
        };

        let changes = ProfileChanges {
            user_name,
            email,
            avatar: new_avatar.clone().or_else(|| current.avatar.clone()),
        };

        let updated = match self.user_repo.update_profile(user_id, &changes).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.discard(new_avatar.as_deref()).await;
                return Err(AuthError::UserNotFound);
            }
            Err(e) => {
                self.discard(new_avatar.as_deref()).await;
                return Err(e);
            }
        };

        // Old avatar is unreferenced once the row points at the new one
        if new_avatar.is_some() {
            self.discard(current.avatar.as_deref()).await;
        }

        tracing::info!(user_id = %user_id, avatar_changed = new_avatar.is_some(), "Profile updated");

        Ok(updated)
    }

    async fn discard(&self, path: Option<&str>) {
        if let Some(path) = path {
            self.uploads.remove(path).await;
        }
    }
}
