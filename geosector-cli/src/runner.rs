//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers start from a ready environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geosector::config::ConfigFile;
use geosector::log::{Logger, TracingLogger};
use geosector::logging::{init_logging, split_log_path, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load config from `config_path` (defaults when missing) and start logging.
    ///
    /// Log records always go to the configured file. With `debug_mode` they
    /// are also echoed to stdout at debug level.
    pub fn new(config_path: &Path, debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path: config_path.to_path_buf(),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// The file records are being written to.
    pub fn log_path(&self) -> &Path {
        self.logging_guard.log_path()
    }

    /// Library logger that forwards into `tracing`.
    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::new(TracingLogger)
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GeoSector v{}", geosector::VERSION);
        info!("GeoSector CLI: {} command", command);
        info!("Configuration: {}", self.config_path.display());
    }
}
