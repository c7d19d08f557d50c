//! Domain Layer
//!
//! Contains entities, value objects, pagination, and repository traits.

pub mod entity;
pub mod pagination;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Account, GrowthRecord, NewAccount, NewGrowthRecord, RecordFields};
pub use pagination::{Page, PageRequest, paginate};
pub use repository::{AccountRepository, RecordRepository};
