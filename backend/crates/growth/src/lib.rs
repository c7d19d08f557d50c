//! Growth Record Backend Module
//!
//! Accounts (children) owned by a user, and dated growth records
//! (height, weight, memo, photo) under each account.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, validated fields, repository traits, pagination
//! - `application/` - One use case per operation
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every operation is scoped to the caller identity from `auth::CurrentUser`.
//! Resources owned by someone else are reported as not found.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GrowthConfig;
pub use error::{GrowthError, GrowthResult};
pub use infra::{memory::InMemoryGrowthRepository, postgres::PgGrowthRepository};
pub use presentation::router::{growth_router, growth_router_generic};
