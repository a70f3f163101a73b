//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geobridge::channel::EnvelopeStatus;
use geobridge::config::ConfigFileError;
use geobridge::plugin::PluginError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Failed to construct the plugin
    Plugin(PluginError),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to read a scripted event file
    EventFile { path: String, reason: String },
    /// Failed to install the interrupt handler
    Signal(String),
    /// Failed to encode an envelope
    Output(serde_json::Error),
    /// The request finished without a position
    RequestFailed(EnvelopeStatus),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in the config file, or regenerate it with:");
                eprintln!("  geobridge config init --force");
            }
            CliError::RequestFailed(EnvelopeStatus::PermissionDenied) => {
                eprintln!();
                eprintln!("The capability named in the envelope above was refused.");
            }
            _ => {}
        }

        let code = match self {
            CliError::RequestFailed(_) => 2,
            _ => 1,
        };
        process::exit(code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Plugin(e) => write!(f, "Failed to create location plugin: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::EventFile { path, reason } => {
                write!(f, "Failed to read event file '{}': {}", path, reason)
            }
            CliError::Signal(msg) => write!(f, "Failed to install interrupt handler: {}", msg),
            CliError::Output(e) => write!(f, "Failed to encode envelope: {}", e),
            CliError::RequestFailed(status) => {
                write!(f, "Location request ended with status {:?}", status)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Plugin(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<PluginError> for CliError {
    fn from(e: PluginError) -> Self {
        CliError::Plugin(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
