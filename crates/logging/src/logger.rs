//! Tracing subscriber setup

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use common::error::{Error, Result};
use settings::{LogFormat, LoggingConfig};

/// Builds and installs the global subscriber
pub struct Logger {
    /// Filter directive used when `RUST_LOG` is unset
    default_directive: String,

    /// Output format
    format: LogFormat,
}

impl Logger {
    /// Creates a logger from the logging configuration
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            default_directive: config.level.clone(),
            format: config.format,
        }
    }

    /// Resolves the filter: `RUST_LOG` wins over the configured level
    pub fn filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.default_directive).map_err(|e| {
                Error::Config(format!(
                    "invalid logging.level '{}': {}",
                    self.default_directive, e
                ))
            }),
        }
    }

    /// Installs the subscriber
    ///
    /// Returns `Ok(false)` when a global subscriber was already installed,
    /// which happens when several tests initialise logging.
    pub fn install(self) -> Result<bool> {
        let filter = self.filter()?;

        let installed = match self.format {
            LogFormat::Text => fmt()
                .with_env_filter(filter)
                .try_init()
                .is_ok(),
            LogFormat::Json => fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(true)
                .try_init()
                .is_ok(),
        };

        if installed {
            debug!("Logging initialized with {:?} output", self.format);
        }
        Ok(installed)
    }
}

/// Initializes logging from configuration
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    Logger::new(config).install()
}
