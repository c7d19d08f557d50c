//! Login Use Case
//!
//! Verifies credentials, provisions the default account on first login and
//! issues a bearer token.

use std::sync::Arc;

use crate::application::access_token::issue_access_token;
use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::{AccountProvisioner, UserRepository};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub token: String,
    pub user: User,
}

/// Login use case
pub struct LoginUseCase<U, P>
where
    U: UserRepository,
    P: AccountProvisioner,
{
    user_repo: Arc<U>,
    provisioner: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<U, P> LoginUseCase<U, P>
where
    U: UserRepository,
    P: AccountProvisioner,
{
    pub fn new(user_repo: Arc<U>, provisioner: Arc<P>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            provisioner,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // A name that could never have registered is just an unknown user
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let raw_password = RawPassword::for_login(input.password);
        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let created = self
            .provisioner
            .ensure_default_account(user.user_id, user.user_name.original())
            .await?;
        if created {
            tracing::info!(user_id = %user.user_id, "Default account created");
        }

        let now = chrono::Utc::now().timestamp();
        let token = issue_access_token(
            &self.config,
            user.user_id,
            user.user_name.original(),
            now,
        )?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput { token, user })
    }
}
