//! Access Token Issuing and Verification
//!
//! Bearer tokens carry the user id and name so protected handlers never
//! need a session lookup.

use kernel::id::UserId;
use platform::token::TokenError;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User id
    pub sub: UserId,
    /// User name at the time of login (display only)
    pub username: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

/// Sign a token for `user_id` valid for the configured lifetime from `now`
pub fn issue_access_token(
    config: &AuthConfig,
    user_id: UserId,
    user_name: &str,
    now: i64,
) -> AuthResult<String> {
    let claims = AccessTokenClaims {
        sub: user_id,
        username: user_name.to_string(),
        iat: now,
        exp: now.saturating_add(config.token_ttl_secs()),
    };

    config
        .signer()
        .sign(&claims)
        .map_err(|e| AuthError::Internal(e.to_string()))
}

/// Verify a token's signature and expiry at `now`
pub fn verify_access_token(
    config: &AuthConfig,
    token: &str,
    now: i64,
) -> AuthResult<AccessTokenClaims> {
    config.signer().verify_at(token, now).map_err(|e| {
        match e {
            TokenError::Expired => tracing::debug!("Expired bearer token"),
            other => tracing::debug!(reason = %other, "Bearer token rejected"),
        }
        AuthError::InvalidToken
    })
}
