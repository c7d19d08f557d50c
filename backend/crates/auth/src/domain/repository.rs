//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::{NewUser, ProfileChanges, User};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user and return it with its assigned id
    ///
    /// A uniqueness violation is reported as `UserNameTaken` / `EmailTaken`,
    /// even if it slipped past the `exists_*` pre-checks.
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user by canonical user name
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Check if the user name is used by anyone other than `excluding`
    async fn exists_by_user_name(
        &self,
        user_name: &UserName,
        excluding: Option<UserId>,
    ) -> AuthResult<bool>;

    /// Check if the email is used by anyone other than `excluding`
    async fn exists_by_email(&self, email: &Email, excluding: Option<UserId>) -> AuthResult<bool>;

    /// Replace profile fields; `None` if the user does not exist
    async fn update_profile(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
    ) -> AuthResult<Option<User>>;
}

/// Default account provisioning, implemented by the growth store
///
/// Login calls this so every user owns at least one account.
#[trait_variant::make(AccountProvisioner: Send)]
pub trait LocalAccountProvisioner {
    /// Create an account named `name` if the user owns none
    ///
    /// Returns `true` when an account was created.
    async fn ensure_default_account(&self, user_id: UserId, name: &str) -> AuthResult<bool>;
}
