//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::GrowthAppState;
pub use router::{growth_router, growth_router_generic};
