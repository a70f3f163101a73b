//! Platform capabilities required before any location hardware is touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single platform capability (runtime permission).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Read the device phone state (the SDK keys its requests on the device id).
    ReadPhoneState,
    /// Approximate (network-based) location.
    CoarseLocation,
    /// Precise (GPS) location.
    FineLocation,
    /// Read external storage (offline positioning cache).
    ReadExternalStorage,
    /// Write external storage (offline positioning cache).
    WriteExternalStorage,
}

impl Capability {
    /// All capabilities in the order they must be checked and requested.
    pub const ALL: [Capability; 5] = [
        Capability::ReadPhoneState,
        Capability::CoarseLocation,
        Capability::FineLocation,
        Capability::ReadExternalStorage,
        Capability::WriteExternalStorage,
    ];

    /// Stable identifier reported to callers.
    pub const fn id(&self) -> &'static str {
        match self {
            Capability::ReadPhoneState => "read-phone-state",
            Capability::CoarseLocation => "coarse-location",
            Capability::FineLocation => "fine-location",
            Capability::ReadExternalStorage => "read-external-storage",
            Capability::WriteExternalStorage => "write-external-storage",
        }
    }

    /// The Android manifest permission backing this capability.
    pub const fn android_permission(&self) -> &'static str {
        match self {
            Capability::ReadPhoneState => "android.permission.READ_PHONE_STATE",
            Capability::CoarseLocation => "android.permission.ACCESS_COARSE_LOCATION",
            Capability::FineLocation => "android.permission.ACCESS_FINE_LOCATION",
            Capability::ReadExternalStorage => "android.permission.READ_EXTERNAL_STORAGE",
            Capability::WriteExternalStorage => "android.permission.WRITE_EXTERNAL_STORAGE",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a capability identifier is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability '{0}'")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    /// Accepts either the stable id or the Android permission string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Capability::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s) || c.android_permission() == s)
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

/// Ordered set of capabilities required before acquisition.
///
/// Order is significant: grant results are scanned in this order and the
/// first denial is the one reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    capabilities: Vec<Capability>,
}

impl CapabilitySet {
    /// The fixed set required by the location SDK.
    pub fn required() -> Self {
        Self {
            capabilities: Capability::ALL.to_vec(),
        }
    }

    pub fn as_slice(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::required()
    }
}
