//! Capability checks in front of the location hardware.
//!
//! The gate never lets the session start while any required capability is
//! missing. When capabilities are missing it drives the platform grant
//! dialog and reports the first denial.

mod capability;
mod gate;

pub use capability::{Capability, CapabilitySet, UnknownCapability};
pub use gate::{
    GateDecision, GrantResult, PermissionGate, PermissionPlatform, PERMISSION_DENIED_MESSAGE,
};
