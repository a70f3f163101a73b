//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging for commands that
//! drive the plugin.

use tokio::runtime::Runtime;
use tracing::info;

use geobridge::config::ConfigFile;
use geobridge::logging::{default_log_file, init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// With `verbose`, log events are mirrored to stderr as well as the log
    /// file. Stdout is reserved for envelopes.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let logging_guard = init_logging(&log_dir, &log_file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GeoBridge v{}", geobridge::VERSION);
        info!("GeoBridge CLI: {} command", command);
    }

    /// Build the runtime plugin requests execute on.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("geobridge-worker")
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }
}
