//! Interfaces of the native location client.

use std::sync::Arc;

use thiserror::Error;

use super::event::RawLocationEvent;
use super::options::SessionOptions;

/// Callback the native client invokes with each fix.
///
/// May run on any thread the native layer chooses.
pub type LocationListener = Arc<dyn Fn(RawLocationEvent) + Send + Sync>;

/// Errors raised by the native SDK boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SdkError {
    /// The native client could not be constructed.
    #[error("location client could not be created: {0}")]
    Creation(String),
}

/// A stateful native location client handle.
pub trait LocationClient: Send + Sync {
    /// Apply the option record. Called once, before the first start.
    fn set_options(&self, options: &SessionOptions);

    /// Register a listener. Every registered listener receives every event.
    fn register_listener(&self, listener: LocationListener);

    /// Begin a scan.
    fn start(&self);

    /// Stop scanning and release SDK resources.
    fn stop(&self);
}

/// Constructs native client handles.
pub trait LocationClientFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn LocationClient>, SdkError>;
}
