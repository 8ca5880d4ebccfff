//! Configuration manager
//!
//! Builds a [`ControlPlaneConfig`] from layered sources and validates it.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use tracing::{debug, info};

use common::error::{Error, Result};

use crate::environment::{self, ENV_PREFIX, ENV_SEPARATOR};
use crate::schema::ControlPlaneConfig;
use crate::validation::ConfigValidator;

/// Configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Resolved configuration
    config: ControlPlaneConfig,

    /// File the configuration was read from, if any
    source_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Creates a configuration manager from defaults and the process environment
    pub fn new() -> Result<Self> {
        Self::load(None)
    }

    /// Loads configuration from an optional file and the process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_from(file, environment::process_environment())
    }

    /// Loads configuration from an optional file and the given environment snapshot
    pub fn load_from(file: Option<&Path>, env: Map<String, String>) -> Result<Self> {
        let defaults = Config::try_from(&ControlPlaneConfig::default()).map_err(config_error)?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = file {
            info!("Loading configuration file {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        for (key, value) in environment::legacy_overrides(&env) {
            debug!("Applying legacy environment override for {}", key);
            builder = builder.set_override(key, value).map_err(config_error)?;
        }

        let config: ControlPlaneConfig = builder
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(config_error)?;

        ConfigValidator::validate(&config)?;

        Ok(Self {
            config,
            source_file: file.map(Path::to_path_buf),
        })
    }

    /// Creates a manager around an already built configuration
    pub fn from_config(config: ControlPlaneConfig) -> Result<Self> {
        ConfigValidator::validate(&config)?;
        Ok(Self {
            config,
            source_file: None,
        })
    }

    /// Returns the resolved configuration
    pub fn config(&self) -> &ControlPlaneConfig {
        &self.config
    }

    /// Returns the configuration file in use, if any
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }
}

fn config_error(err: config::ConfigError) -> Error {
    Error::Config(err.to_string())
}
