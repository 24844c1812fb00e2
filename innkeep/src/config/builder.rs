//! Layered configuration construction.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds the effective configuration from its layers.
///
/// Layers, lowest precedence first:
/// 1. Built-in defaults
/// 2. `{data_dir}/config.yaml`
/// 3. `INNKEEP_*` environment variables
/// 4. Programmatic overrides ([`ConfigBuilder::with_config`])
///
/// The merged result is validated before it is returned.
///
/// # Examples
///
/// ```
/// use innkeep::config::{CommitPolicy, Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         rooms: Some(vec!["Attic".into()]),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.room_names(), vec!["Attic"]);
/// assert_eq!(config.commit_policy(), CommitPolicy::Transactional);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Vec<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads files and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data directory holding `config.yaml`.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(data_dir.as_ref().to_path_buf());
        self
    }

    /// Skips loading `config.yaml`.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skips `INNKEEP_*` environment overrides.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Adds a programmatic layer above every other source.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides.push(config);
        self
    }

    /// Merges the layers and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, an environment
    /// variable is malformed, or the merged configuration is invalid.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if !self.skip_files {
            let data_dir = match self.data_dir {
                Some(dir) => dir,
                None => crate::database::default_data_dir()?,
            };
            if let Some(source) = ConfigLoader::load_data_dir_config(&data_dir)? {
                log::debug!("Loaded configuration from {}", source.path.display());
                ConfigMerger::merge_into(&mut config, &source.config);
            }
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        for layer in &self.overrides {
            ConfigMerger::merge_into(&mut config, layer);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
