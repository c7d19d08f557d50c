//! Create Account Use Case

use std::sync::Arc;

use kernel::id::UserId;
use platform::multipart::UploadedFile;
use platform::upload::UploadStore;

use crate::application::attachment;
use crate::domain::entity::{Account, NewAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountName, parse_date};
use crate::error::GrowthResult;

/// Create account input (raw form values)
pub struct CreateAccountInput {
    pub name: String,
    /// `YYYY-MM-DD`; `None` or blank for unknown
    pub birthday: Option<String>,
    pub icon: Option<UploadedFile>,
}

/// Create account use case
pub struct CreateAccountUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    uploads: Arc<UploadStore>,
}

impl<A> CreateAccountUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>, uploads: Arc<UploadStore>) -> Self {
        Self {
            account_repo,
            uploads,
        }
    }

    pub async fn execute(&self, user_id: UserId, input: CreateAccountInput) -> GrowthResult<Account> {
        let name = AccountName::new(&input.name)?;
        let birthday = input
            .birthday
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_date("birthday", raw))
            .transpose()?;

        let icon = attachment::store(&self.uploads, input.icon.as_ref()).await?;

        let new_account = NewAccount {
            user_id,
            name,
            birthday,
            icon,
        };

        let account = match self.account_repo.create_account(&new_account).await {
            Ok(account) => account,
            Err(e) => {
                attachment::discard(&self.uploads, new_account.icon.as_deref()).await;
                return Err(e);
            }
        };

        tracing::info!(
            user_id = %user_id,
            account_id = %account.account_id,
            "Account created"
        );

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;
    use crate::error::GrowthError;

    fn input(name: &str, birthday: Option<&str>, icon: Option<UploadedFile>) -> CreateAccountInput {
        CreateAccountInput {
            name: name.to_string(),
            birthday: birthday.map(str::to_string),
            icon,
        }
    }

    #[tokio::test]
    async fn test_create_with_birthday_and_icon() {
        let f = Fixture::new();
        let use_case = CreateAccountUseCase::new(f.repo(), f.uploads.clone());

        let account = use_case
            .execute(
                f.user,
                input(" たろう ", Some("2021-04-01"), Fixture::image("icon.PNG")),
            )
            .await
            .unwrap();

        assert_eq!(account.user_id, f.user);
        assert_eq!(account.name.as_str(), "たろう");
        assert_eq!(account.birthday.unwrap().to_string(), "2021-04-01");
        let icon = account.icon.unwrap();
        assert!(icon.ends_with(".png"));
        assert!(f.uploads.resolve(&icon).unwrap().exists());
    }

    #[tokio::test]
    async fn test_blank_birthday_is_none() {
        let f = Fixture::new();
        let use_case = CreateAccountUseCase::new(f.repo(), f.uploads.clone());

        let account = use_case
            .execute(f.user, input("hana", Some("  "), None))
            .await
            .unwrap();
        assert!(account.birthday.is_none());
        assert!(account.icon.is_none());
    }

    #[tokio::test]
    async fn test_invalid_fields_store_nothing() {
        let f = Fixture::new();
        let use_case = CreateAccountUseCase::new(f.repo(), f.uploads.clone());

        let no_name = use_case
            .execute(f.user, input("", None, Fixture::image("icon.png")))
            .await;
        assert!(matches!(no_name, Err(GrowthError::Validation(_))));

        let bad_birthday = use_case
            .execute(f.user, input("hana", Some("04/01/2021"), None))
            .await;
        assert!(matches!(bad_birthday, Err(GrowthError::Validation(_))));

        assert_eq!(f.stored_files(), 0);
    }
}
