//! Boundary to the native location SDK.
//!
//! The SDK's positioning algorithm is external. This module defines only
//! what the bridge consumes: a client handle that can be configured,
//! listened to, started and stopped, and the event shape it delivers.

mod client;
mod event;
mod options;

pub use client::{LocationClient, LocationClientFactory, LocationListener, SdkError};
pub use event::{
    FixCommon, GpsReading, LocationSource, NetworkReading, PoiEntry, RawLocationEvent,
    SourceReading,
};
pub use options::{CoordinateSystem, LocationMode, SessionOptions, SessionOptionsBuilder};
