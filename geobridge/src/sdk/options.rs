//! Fixed configuration applied to the native location client.

use std::fmt;
use std::str::FromStr;

/// Positioning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationMode {
    /// GPS and network combined.
    #[default]
    HighAccuracy,
    /// Network only.
    BatterySaving,
    /// GPS only.
    DeviceSensors,
}

impl LocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMode::HighAccuracy => "high_accuracy",
            LocationMode::BatterySaving => "battery_saving",
            LocationMode::DeviceSensors => "device_sensors",
        }
    }
}

impl FromStr for LocationMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high_accuracy" => Ok(LocationMode::HighAccuracy),
            "battery_saving" => Ok(LocationMode::BatterySaving),
            "device_sensors" => Ok(LocationMode::DeviceSensors),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinate system of reported fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSystem {
    /// Baidu-encrypted latitude/longitude.
    #[default]
    Bd09ll,
    /// China national encrypted coordinates.
    Gcj02,
    /// Raw WGS-84.
    Wgs84,
}

impl CoordinateSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystem::Bd09ll => "bd09ll",
            CoordinateSystem::Gcj02 => "gcj02",
            CoordinateSystem::Wgs84 => "wgs84",
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bd09ll" => Ok(CoordinateSystem::Bd09ll),
            "gcj02" => Ok(CoordinateSystem::Gcj02),
            "wgs84" => Ok(CoordinateSystem::Wgs84),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable option record applied once to the native client.
///
/// Built with [`SessionOptions::builder`]; there are no setters, so the
/// options cannot change between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    mode: LocationMode,
    coordinate_system: CoordinateSystem,
    scan_interval_ms: u32,
    need_address: bool,
    open_gps: bool,
    location_notify: bool,
    need_location_describe: bool,
    need_poi: bool,
    kill_process_on_stop: bool,
    ignore_cache_exception: bool,
    filter_simulated_gps: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: LocationMode::HighAccuracy,
            coordinate_system: CoordinateSystem::Bd09ll,
            scan_interval_ms: 0,
            need_address: true,
            open_gps: true,
            location_notify: false,
            need_location_describe: false,
            need_poi: false,
            kill_process_on_stop: true,
            ignore_cache_exception: false,
            filter_simulated_gps: true,
        }
    }
}

impl SessionOptions {
    pub fn builder() -> SessionOptionsBuilder {
        SessionOptionsBuilder {
            options: Self::default(),
        }
    }

    pub fn mode(&self) -> LocationMode {
        self.mode
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    /// Scan interval in milliseconds. Zero means a single fix per start.
    pub fn scan_interval_ms(&self) -> u32 {
        self.scan_interval_ms
    }

    pub fn is_single_shot(&self) -> bool {
        self.scan_interval_ms == 0
    }

    pub fn need_address(&self) -> bool {
        self.need_address
    }

    pub fn open_gps(&self) -> bool {
        self.open_gps
    }

    /// Continuous 1 Hz GPS notification while a fix is valid.
    pub fn location_notify(&self) -> bool {
        self.location_notify
    }

    pub fn need_location_describe(&self) -> bool {
        self.need_location_describe
    }

    pub fn need_poi(&self) -> bool {
        self.need_poi
    }

    pub fn kill_process_on_stop(&self) -> bool {
        self.kill_process_on_stop
    }

    pub fn ignore_cache_exception(&self) -> bool {
        self.ignore_cache_exception
    }

    pub fn filter_simulated_gps(&self) -> bool {
        self.filter_simulated_gps
    }
}

/// Builder for [`SessionOptions`].
///
/// Scan interval and continuous notification are not exposed: the session
/// is single-shot.
#[derive(Debug, Clone)]
pub struct SessionOptionsBuilder {
    options: SessionOptions,
}

impl SessionOptionsBuilder {
    pub fn mode(mut self, mode: LocationMode) -> Self {
        self.options.mode = mode;
        self
    }

    pub fn coordinate_system(mut self, coordinate_system: CoordinateSystem) -> Self {
        self.options.coordinate_system = coordinate_system;
        self
    }

    pub fn need_address(mut self, need: bool) -> Self {
        self.options.need_address = need;
        self
    }

    pub fn open_gps(mut self, open: bool) -> Self {
        self.options.open_gps = open;
        self
    }

    pub fn need_location_describe(mut self, need: bool) -> Self {
        self.options.need_location_describe = need;
        self
    }

    pub fn need_poi(mut self, need: bool) -> Self {
        self.options.need_poi = need;
        self
    }

    pub fn build(self) -> SessionOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_single_shot() {
        let options = SessionOptions::default();
        assert!(options.is_single_shot());
        assert!(!options.location_notify());
        assert_eq!(options.mode(), LocationMode::HighAccuracy);
        assert_eq!(options.coordinate_system(), CoordinateSystem::Bd09ll);
        assert!(options.need_address());
        assert!(options.open_gps());
        assert!(options.kill_process_on_stop());
        assert!(options.filter_simulated_gps());
        assert!(!options.ignore_cache_exception());
    }

    #[test]
    fn test_builder_keeps_single_shot() {
        let options = SessionOptions::builder()
            .mode(LocationMode::BatterySaving)
            .coordinate_system(CoordinateSystem::Gcj02)
            .need_poi(true)
            .build();

        assert_eq!(options.mode(), LocationMode::BatterySaving);
        assert_eq!(options.coordinate_system(), CoordinateSystem::Gcj02);
        assert!(options.need_poi());
        assert!(options.is_single_shot());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("GCJ02".parse(), Ok(CoordinateSystem::Gcj02));
        assert_eq!("device_sensors".parse(), Ok(LocationMode::DeviceSensors));
        assert!("mercator".parse::<CoordinateSystem>().is_err());
    }
}
