//! Configuration system for innkeep.
//!
//! This module provides layered configuration with support for:
//! - A YAML configuration file in the data directory
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of the merged result
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`INNKEEP_*`)
//! 3. `{data_dir}/config.yaml`
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use innkeep::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_data_dir(Path::new("/var/lib/innkeep"))
//!     .build()
//!     .unwrap();
//!
//! println!("Commit policy: {}", config.commit_policy());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{
    BookingConfig, CommitPolicy, Config, DatabaseSettings, MailConfig, SessionConfig,
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_QUERY_TIMEOUT_MS, DEFAULT_ROOMS,
};
pub use validator::ConfigValidator;
