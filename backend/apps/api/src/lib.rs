//! Growth record API server
//!
//! Wires the `auth` and `growth` routers together with upload serving,
//! CORS and settings from the environment.

pub mod app;
pub mod settings;

pub use app::{AppParts, build_app, cors_layer};
pub use settings::Settings;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
