//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::sdk::{CoordinateSystem, LocationMode};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("mode") {
            config.location.mode = parse_choice::<LocationMode>(
                "location",
                "mode",
                v,
                "must be one of: high_accuracy, battery_saving, device_sensors",
            )?;
        }
        if let Some(v) = section.get("coordinate_system") {
            config.location.coordinate_system = parse_choice::<CoordinateSystem>(
                "location",
                "coordinate_system",
                v,
                "must be one of: bd09ll, gcj02, wgs84",
            )?;
        }
        if let Some(v) = section.get("need_address") {
            config.location.need_address = parse_bool("location", "need_address", v)?;
        }
        if let Some(v) = section.get("open_gps") {
            config.location.open_gps = parse_bool("location", "open_gps", v)?;
        }
        if let Some(v) = section.get("need_location_describe") {
            config.location.need_location_describe =
                parse_bool("location", "need_location_describe", v)?;
        }
        if let Some(v) = section.get("need_poi") {
            config.location.need_poi = parse_bool("location", "need_poi", v)?;
        }
    }

    // [request] section
    if let Some(section) = ini.section(Some("request")) {
        if let Some(v) = section.get("timeout_secs") {
            config.request.timeout_secs = match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(invalid("request", "timeout_secs", v, "must be a positive integer (seconds)")),
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_choice<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(section, key, value, "must be true or false")),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
