//! List Accounts Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::error::GrowthResult;

/// List accounts use case
pub struct ListAccountsUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
}

impl<A> ListAccountsUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> GrowthResult<Vec<Account>> {
        self.account_repo.list_accounts(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    #[tokio::test]
    async fn test_only_callers_accounts_in_id_order() {
        let f = Fixture::new();
        let first = f.account(f.user, "first").await;
        f.account(f.other_user, "not mine").await;
        let second = f.account(f.user, "second").await;

        let accounts = ListAccountsUseCase::new(f.repo())
            .execute(f.user)
            .await
            .unwrap();

        let ids: Vec<_> = accounts.iter().map(|a| a.account_id).collect();
        assert_eq!(ids, vec![first, second]);
    }
}
