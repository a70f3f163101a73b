//! Simulated collaborators.
//!
//! Stand-ins for the platform permission subsystem and the native location
//! SDK. The CLI drives the bridge through them, and the tests use them to
//! observe handle creation, listener registration and start/stop counts.

mod client;
mod platform;

pub use client::{Delivery, SimulatedClient, SimulatedClientFactory};
pub use platform::SimulatedPlatform;
