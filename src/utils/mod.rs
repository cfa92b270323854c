//! Utility modules for error handling, configuration, and text shaping

pub mod config;
pub mod error;
pub mod text;

// Re-export for convenience
pub use config::Settings;
pub use error::VidgateError;
