//! Infrastructure Layer
//!
//! Repository implementations for PostgreSQL and process memory.

pub mod memory;
pub mod postgres;
