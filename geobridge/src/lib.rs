//! GeoBridge - single-shot device location for scripted hosts
//!
//! A caller issues `getCurrentPosition` over a callback channel. The bridge
//! makes sure the device capabilities are granted, runs one scan on a lazily
//! created native location client, and answers with one terminal envelope:
//! a translated position, an error, or the capability that was refused.
//!
//! ```text
//!   caller ──► LocationPlugin::execute
//!                 │
//!                 ├── PermissionGate ───── PermissionPlatform
//!                 ├── LocationSession ──── LocationClient (native SDK)
//!                 │        └── EventTranslator
//!                 └── CallbackChannel ──► ResultSink
//! ```

pub mod channel;
pub mod config;
pub mod logging;
pub mod permission;
pub mod plugin;
pub mod sdk;
pub mod session;
pub mod simulation;
pub mod translate;

pub use channel::{CallbackChannel, EnvelopeStatus, ResultEnvelope, ResultSink};
pub use permission::{Capability, CapabilitySet, GateDecision, PermissionGate, PermissionPlatform};
pub use plugin::{Command, LocationPlugin, PluginConfig, PluginError};
pub use session::{LocationSession, RequestId, SessionError, SessionState};
pub use translate::{EventTranslator, TranslationError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
