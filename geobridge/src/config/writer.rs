//! INI serialization: `ConfigFile` → commented INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let location = &config.location;

    format!(
        r#"[location]
; Positioning mode:
;   high_accuracy  - GPS and network combined (default)
;   battery_saving - network only
;   device_sensors - GPS only
mode = {}
; Coordinate system of reported fixes: bd09ll (default), gcj02, wgs84
coordinate_system = {}
; Ask the provider for a street address
need_address = {}
; Allow the GPS receiver to be switched on
open_gps = {}
; Ask for a human-readable place description
need_location_describe = {}
; Ask for nearby points of interest
need_poi = {}

[request]
; Seconds a started scan may take before the request fails
timeout_secs = {}

[logging]
; Log file, cleared on every start
file = {}
"#,
        location.mode,
        location.coordinate_system,
        location.need_address,
        location.open_gps,
        location.need_location_describe,
        location.need_poi,
        config.request.timeout_secs,
        config.logging.file.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;

    #[test]
    fn test_output_is_valid_ini() {
        let text = to_config_string(&ConfigFile::default());
        let ini = Ini::load_from_str(&text).unwrap();

        let location = ini.section(Some("location")).unwrap();
        assert_eq!(location.get("mode"), Some("high_accuracy"));
        assert_eq!(location.get("coordinate_system"), Some("bd09ll"));
        assert_eq!(location.get("need_address"), Some("true"));
        assert_eq!(ini.section(Some("request")).unwrap().get("timeout_secs"), Some("30"));
    }
}
