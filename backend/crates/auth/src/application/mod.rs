//! Application Layer
//!
//! Use cases and application services.

pub mod access_token;
pub mod config;
pub mod get_profile;
pub mod login;
pub mod register;
pub mod update_profile;

// Re-exports
pub use access_token::{AccessTokenClaims, issue_access_token, verify_access_token};
pub use config::AuthConfig;
pub use get_profile::GetProfileUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
