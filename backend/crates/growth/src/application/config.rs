//! Application Configuration
//!
//! Configuration for the Growth application layer.

/// Growth application configuration
#[derive(Debug, Clone)]
pub struct GrowthConfig {
    /// Records per page when `perPage` is not given
    pub default_page_size: usize,
    /// Upper bound applied to `perPage`
    pub max_page_size: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl GrowthConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }
}
