//! Translation of raw native events into result documents.
//!
//! Every document carries the common keys:
//!
//! | Key | Value |
//! |-----|-------|
//! | `time` | capture time, unix seconds |
//! | `locType` | numeric source code |
//! | `source` | source tag (`gps`, `network`, ...) |
//! | `latitude`, `longitude`, `radius` | fix coordinates and accuracy |
//! | `locationDescribe` | semantic description or `null` |
//! | `poiList` | `[{id, name, rank}]`, only when the SDK reported a list |
//!
//! plus the keys of its source:
//!
//! | Source | Extra keys |
//! |--------|------------|
//! | GPS | `speed`, `satellite`, `height`, `direction`, `addr`, `describe` |
//! | Network | `addr`, `operators`, `describe` |
//! | Offline, ServerError, NetworkException, CriteriaException | `describe` |
//! | Unknown | none |

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::sdk::{LocationSource, PoiEntry, RawLocationEvent, SourceReading};

pub const GPS_DESCRIPTION: &str = "GPS fix succeeded";
pub const NETWORK_DESCRIPTION: &str = "network fix succeeded";
pub const OFFLINE_DESCRIPTION: &str = "offline fix succeeded (still valid)";
pub const SERVER_ERROR_DESCRIPTION: &str = "server-side network fix failed; report the device \
     identifier (IMEI) and the approximate time of the fix to loc-bugs@baidu.com so the cause \
     can be traced";
pub const NETWORK_EXCEPTION_DESCRIPTION: &str =
    "fix failed because the network is unreachable; check network connectivity";
pub const CRITERIA_EXCEPTION_DESCRIPTION: &str = "fix failed because no valid positioning \
     criteria could be obtained; this is usually the device, commonly flight mode; try \
     restarting the phone";

/// Errors raised while building a result document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranslationError {
    /// A numeric field held NaN or an infinity.
    #[error("field '{field}' is not a finite number and cannot be serialized")]
    NonFiniteField { field: String },
}

/// Fixed description for a source, if it has one.
pub fn description(source: LocationSource) -> Option<&'static str> {
    match source {
        LocationSource::Gps => Some(GPS_DESCRIPTION),
        LocationSource::Network => Some(NETWORK_DESCRIPTION),
        LocationSource::Offline => Some(OFFLINE_DESCRIPTION),
        LocationSource::ServerError => Some(SERVER_ERROR_DESCRIPTION),
        LocationSource::NetworkException => Some(NETWORK_EXCEPTION_DESCRIPTION),
        LocationSource::CriteriaException => Some(CRITERIA_EXCEPTION_DESCRIPTION),
        LocationSource::Unknown(_) => None,
    }
}

/// Maps raw events to result documents. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTranslator;

impl EventTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Build the result document for one event.
    pub fn translate(&self, event: &RawLocationEvent) -> Result<Value, TranslationError> {
        let fix = &event.fix;
        let source = event.location_source();
        let mut doc = Map::new();

        doc.insert("time".into(), Value::from(fix.time));
        doc.insert("locType".into(), Value::from(source.code()));
        doc.insert("source".into(), Value::from(source.tag()));
        doc.insert("latitude".into(), finite("latitude", fix.latitude)?);
        doc.insert("longitude".into(), finite("longitude", fix.longitude)?);
        doc.insert("radius".into(), finite("radius", fix.radius)?);

        match &event.source {
            SourceReading::Gps(gps) => {
                doc.insert("speed".into(), finite("speed", gps.speed)?);
                doc.insert("satellite".into(), Value::from(gps.satellites));
                doc.insert("height".into(), finite("height", gps.altitude)?);
                doc.insert("direction".into(), finite("direction", gps.direction)?);
                doc.insert("addr".into(), optional_text(gps.address.as_deref()));
            }
            SourceReading::Network(network) => {
                doc.insert("addr".into(), optional_text(network.address.as_deref()));
                doc.insert("operators".into(), Value::from(network.operators));
            }
            SourceReading::Offline
            | SourceReading::ServerError
            | SourceReading::NetworkException
            | SourceReading::CriteriaException
            | SourceReading::Unknown { .. } => {}
        }

        if let Some(text) = description(source) {
            doc.insert("describe".into(), Value::from(text));
        }

        doc.insert(
            "locationDescribe".into(),
            optional_text(fix.location_describe.as_deref()),
        );

        // Presence, not emptiness, decides whether the key is emitted.
        if let Some(pois) = &fix.poi_list {
            doc.insert("poiList".into(), poi_array(pois)?);
        }

        Ok(Value::Object(doc))
    }
}

fn finite(field: &str, value: f64) -> Result<Value, TranslationError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| TranslationError::NonFiniteField {
            field: field.to_string(),
        })
}

fn optional_text(text: Option<&str>) -> Value {
    text.map(Value::from).unwrap_or(Value::Null)
}

fn poi_array(pois: &[PoiEntry]) -> Result<Value, TranslationError> {
    pois.iter()
        .enumerate()
        .map(|(index, poi)| {
            let mut entry = Map::new();
            entry.insert("id".into(), Value::from(poi.id.as_str()));
            entry.insert("name".into(), Value::from(poi.name.as_str()));
            entry.insert(
                "rank".into(),
                finite(&format!("poiList[{}].rank", index), poi.rank)?,
            );
            Ok(Value::Object(entry))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
