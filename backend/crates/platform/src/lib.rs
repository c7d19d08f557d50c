//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, Base64)
//! - Password hashing (Argon2id)
//! - Signed bearer tokens (HS256 JWT)
//! - Upload storage on the local filesystem
//! - Multipart form reading for upload endpoints

pub mod crypto;
pub mod multipart;
pub mod password;
pub mod token;
pub mod upload;
