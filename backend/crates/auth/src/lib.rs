//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, credential value objects, repository traits
//! - `application/` - Use cases (register, login, profile) and token issuing
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, bearer middleware, router
//!
//! ## Features
//! - Registration with username + email + password
//! - Login returning a signed bearer token (HS256, 24h by default)
//! - Default account provisioning on first login (via [`AccountProvisioner`])
//! - Profile read/update with avatar upload
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - One uniform error for unknown user and wrong password
//! - Stateless tokens: no server-side session, no revocation before expiry

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::{AccountProvisioner, UserRepository};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::middleware::{AuthGate, CurrentUser, require_bearer};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
