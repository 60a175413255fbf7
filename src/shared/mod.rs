//! Shared Module
//!
//! Types that describe the collection API independently of any client state:
//! the software record wire format, shared error types and configuration.
//! All types are designed for serialization and transmission over HTTP.

/// Software record wire types
pub mod software;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use software::{ErrorResponse, ListSoftwareResponse, Software, SoftwareFields, SoftwareType};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
