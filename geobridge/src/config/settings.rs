//! Settings structs backing `config.ini`.

use std::path::PathBuf;
use std::time::Duration;

use crate::logging::{default_log_dir, default_log_file};
use crate::plugin::{PluginConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::sdk::{CoordinateSystem, LocationMode, SessionOptions};

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub location: LocationSettings,
    pub request: RequestSettings,
    pub logging: LoggingSettings,
}

/// `[location]` section: options handed to the native client.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub mode: LocationMode,
    pub coordinate_system: CoordinateSystem,
    pub need_address: bool,
    pub open_gps: bool,
    pub need_location_describe: bool,
    pub need_poi: bool,
}

impl Default for LocationSettings {
    fn default() -> Self {
        let options = SessionOptions::default();
        Self {
            mode: options.mode(),
            coordinate_system: options.coordinate_system(),
            need_address: options.need_address(),
            open_gps: options.open_gps(),
            need_location_describe: options.need_location_describe(),
            need_poi: options.need_poi(),
        }
    }
}

/// `[request]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSettings {
    /// Scan deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_dir().join(default_log_file()),
        }
    }
}

impl ConfigFile {
    /// Session options described by the `[location]` section.
    pub fn session_options(&self) -> SessionOptions {
        let location = &self.location;
        SessionOptions::builder()
            .mode(location.mode)
            .coordinate_system(location.coordinate_system)
            .need_address(location.need_address)
            .open_gps(location.open_gps)
            .need_location_describe(location.need_location_describe)
            .need_poi(location.need_poi)
            .build()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request.timeout_secs)
    }

    pub fn to_plugin_config(&self) -> PluginConfig {
        PluginConfig::default()
            .with_session_options(self.session_options())
            .with_request_timeout(self.request_timeout())
    }
}
