//! Raw location events delivered by the native client.
//!
//! The native layer classifies every fix with a numeric source code. That
//! code is converted once, at the boundary, into [`LocationSource`] and the
//! tag-specific readings live in [`SourceReading`], so downstream matching
//! is exhaustive.

use serde::{Deserialize, Serialize};

/// How a fix was obtained, or why it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationSource {
    Gps,
    Network,
    Offline,
    ServerError,
    NetworkException,
    CriteriaException,
    /// Any code the SDK may add later.
    Unknown(i32),
}

impl LocationSource {
    pub const GPS_CODE: i32 = 61;
    pub const CRITERIA_EXCEPTION_CODE: i32 = 62;
    pub const NETWORK_EXCEPTION_CODE: i32 = 63;
    pub const OFFLINE_CODE: i32 = 66;
    pub const NETWORK_CODE: i32 = 161;
    pub const SERVER_ERROR_CODE: i32 = 167;

    pub fn from_code(code: i32) -> Self {
        match code {
            Self::GPS_CODE => LocationSource::Gps,
            Self::NETWORK_CODE => LocationSource::Network,
            Self::OFFLINE_CODE => LocationSource::Offline,
            Self::SERVER_ERROR_CODE => LocationSource::ServerError,
            Self::NETWORK_EXCEPTION_CODE => LocationSource::NetworkException,
            Self::CRITERIA_EXCEPTION_CODE => LocationSource::CriteriaException,
            other => LocationSource::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            LocationSource::Gps => Self::GPS_CODE,
            LocationSource::Network => Self::NETWORK_CODE,
            LocationSource::Offline => Self::OFFLINE_CODE,
            LocationSource::ServerError => Self::SERVER_ERROR_CODE,
            LocationSource::NetworkException => Self::NETWORK_EXCEPTION_CODE,
            LocationSource::CriteriaException => Self::CRITERIA_EXCEPTION_CODE,
            LocationSource::Unknown(code) => *code,
        }
    }

    /// Short tag used in result documents.
    pub fn tag(&self) -> &'static str {
        match self {
            LocationSource::Gps => "gps",
            LocationSource::Network => "network",
            LocationSource::Offline => "offline",
            LocationSource::ServerError => "serverError",
            LocationSource::NetworkException => "networkException",
            LocationSource::CriteriaException => "criteriaException",
            LocationSource::Unknown(_) => "unknown",
        }
    }
}

/// A point of interest near the fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiEntry {
    pub id: String,
    pub name: String,
    /// Relevance ordinal; not unique.
    pub rank: f64,
}

impl PoiEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rank: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank,
        }
    }
}

/// Fields present on every event regardless of source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixCommon {
    /// Capture time, unix seconds.
    pub time: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in metres.
    pub radius: f64,
    /// Semantic description such as "near the north gate".
    #[serde(default)]
    pub location_describe: Option<String>,
    /// `None` when the SDK did not report a list at all.
    #[serde(default)]
    pub poi_list: Option<Vec<PoiEntry>>,
}

impl FixCommon {
    /// A fix captured now, with no description or POI list.
    pub fn captured_now(latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            time: chrono::Utc::now().timestamp(),
            latitude,
            longitude,
            radius,
            location_describe: None,
            poi_list: None,
        }
    }
}

/// GPS-only readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsReading {
    /// Ground speed in km/h.
    pub speed: f64,
    pub satellites: u32,
    /// Altitude in metres.
    pub altitude: f64,
    /// Heading in degrees.
    pub direction: f64,
    #[serde(default)]
    pub address: Option<String>,
}

/// Network-only readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReading {
    #[serde(default)]
    pub address: Option<String>,
    /// Carrier code: 0 unknown, 1 mobile, 2 unicom, 3 telecom.
    #[serde(default)]
    pub operators: i32,
}

/// Source-specific part of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceReading {
    Gps(GpsReading),
    Network(NetworkReading),
    Offline,
    ServerError,
    NetworkException,
    CriteriaException,
    Unknown { code: i32 },
}

impl SourceReading {
    pub fn source(&self) -> LocationSource {
        match self {
            SourceReading::Gps(_) => LocationSource::Gps,
            SourceReading::Network(_) => LocationSource::Network,
            SourceReading::Offline => LocationSource::Offline,
            SourceReading::ServerError => LocationSource::ServerError,
            SourceReading::NetworkException => LocationSource::NetworkException,
            SourceReading::CriteriaException => LocationSource::CriteriaException,
            // The reading carries no tag-specific data, so the code is never
            // promoted to a known source.
            SourceReading::Unknown { code } => LocationSource::Unknown(*code),
        }
    }

    /// Reading for a bare source code, with no tag-specific data.
    ///
    /// GPS and network codes get zeroed readings.
    pub fn bare(source: LocationSource) -> Self {
        match source {
            LocationSource::Gps => SourceReading::Gps(GpsReading {
                speed: 0.0,
                satellites: 0,
                altitude: 0.0,
                direction: 0.0,
                address: None,
            }),
            LocationSource::Network => SourceReading::Network(NetworkReading {
                address: None,
                operators: 0,
            }),
            LocationSource::Offline => SourceReading::Offline,
            LocationSource::ServerError => SourceReading::ServerError,
            LocationSource::NetworkException => SourceReading::NetworkException,
            LocationSource::CriteriaException => SourceReading::CriteriaException,
            LocationSource::Unknown(code) => SourceReading::Unknown { code },
        }
    }
}

/// One event from the native client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLocationEvent {
    #[serde(flatten)]
    pub fix: FixCommon,
    pub source: SourceReading,
}

impl RawLocationEvent {
    pub fn new(fix: FixCommon, source: SourceReading) -> Self {
        Self { fix, source }
    }

    pub fn location_source(&self) -> LocationSource {
        self.source.source()
    }
}
