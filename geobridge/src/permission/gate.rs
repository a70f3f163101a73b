//! Permission gate: decides whether acquisition may proceed.
//!
//! # Policy
//!
//! ```text
//! has_all() ──► true ──► Proceed
//!     │
//!     └─► false ──► request_all() ──► scan results in request order
//!                                       │
//!                                       ├─► first denied ──► Denied(capability)
//!                                       ├─► missing result ─► Denied(capability)
//!                                       └─► all granted ────► Proceed
//! ```
//!
//! Only the first denial is reported. Later denials in the same batch are
//! logged at debug level and otherwise ignored.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, info};

use super::capability::{Capability, CapabilitySet};

/// Fixed message attached to every permission-denied result.
pub const PERMISSION_DENIED_MESSAGE: &str = "permission acquisition failed";

/// Outcome of a single capability in a grant dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantResult {
    pub capability: Capability,
    pub granted: bool,
}

impl GrantResult {
    pub fn granted(capability: Capability) -> Self {
        Self {
            capability,
            granted: true,
        }
    }

    pub fn denied(capability: Capability) -> Self {
        Self {
            capability,
            granted: false,
        }
    }
}

/// The platform permission subsystem.
///
/// `request_permissions` shows the grant dialog and resolves once the user
/// answers. Results are expected in request order; a platform may return
/// fewer results than requested when the dialog is interrupted.
pub trait PermissionPlatform: Send + Sync {
    /// Whether the capability is currently granted.
    fn has_permission(&self, capability: Capability) -> bool;

    /// Ask for every capability in `capabilities` at once.
    fn request_permissions<'a>(
        &'a self,
        capabilities: &'a [Capability],
    ) -> BoxFuture<'a, Vec<GrantResult>>;
}

/// Decision reached by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Every capability is granted.
    Proceed,
    /// A capability was denied; acquisition must not start.
    Denied {
        capability: Capability,
        message: &'static str,
    },
}

impl GateDecision {
    fn denied(capability: Capability) -> Self {
        GateDecision::Denied {
            capability,
            message: PERMISSION_DENIED_MESSAGE,
        }
    }
}

/// Checks and requests the capability set in front of the location session.
pub struct PermissionGate {
    platform: Arc<dyn PermissionPlatform>,
    required: CapabilitySet,
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl PermissionGate {
    /// Gate over the SDK's required capability set.
    pub fn new(platform: Arc<dyn PermissionPlatform>) -> Self {
        Self {
            platform,
            required: CapabilitySet::required(),
        }
    }

    pub fn required(&self) -> &CapabilitySet {
        &self.required
    }

    /// True iff every required capability is currently granted.
    ///
    /// Stops at the first missing capability.
    pub fn has_all(&self) -> bool {
        self.required
            .iter()
            .all(|capability| self.platform.has_permission(capability))
    }

    /// Trigger the platform grant dialog for the full set.
    pub async fn request_all(&self) -> Vec<GrantResult> {
        info!(
            count = self.required.len(),
            "Requesting location capabilities"
        );
        self.platform
            .request_permissions(self.required.as_slice())
            .await
    }

    /// Request the full set and evaluate the answer.
    pub async fn acquire(&self) -> GateDecision {
        let results = self.request_all().await;
        self.evaluate(&results)
    }

    /// Apply the first-denial-wins policy to a grant result list.
    pub fn evaluate(&self, results: &[GrantResult]) -> GateDecision {
        let mut reported: Vec<Capability> = Vec::with_capacity(results.len());

        for (index, result) in results.iter().enumerate() {
            if !result.granted {
                info!(capability = %result.capability, "Permission denied");
                let ignored = results[index + 1..].iter().filter(|r| !r.granted).count();
                if ignored > 0 {
                    debug!(ignored, "Later denials in the same batch not reported");
                }
                return GateDecision::denied(result.capability);
            }
            reported.push(result.capability);
        }

        // An interrupted dialog reports nothing for some capabilities.
        if let Some(missing) = self.required.iter().find(|c| !reported.contains(c)) {
            info!(capability = %missing, "No grant result reported, treating as denied");
            return GateDecision::denied(missing);
        }

        GateDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulatedPlatform;
    use proptest::prelude::*;

    fn gate() -> PermissionGate {
        PermissionGate::new(Arc::new(SimulatedPlatform::granting_all()))
    }

    #[test]
    fn test_all_granted_proceeds() {
        let results: Vec<_> = Capability::ALL
            .into_iter()
            .map(GrantResult::granted)
            .collect();
        assert_eq!(gate().evaluate(&results), GateDecision::Proceed);
    }

    #[test]
    fn test_first_denial_wins() {
        let results = vec![
            GrantResult::granted(Capability::ReadPhoneState),
            GrantResult::denied(Capability::CoarseLocation),
            GrantResult::granted(Capability::FineLocation),
            GrantResult::denied(Capability::ReadExternalStorage),
            GrantResult::granted(Capability::WriteExternalStorage),
        ];
        assert_eq!(
            gate().evaluate(&results),
            GateDecision::Denied {
                capability: Capability::CoarseLocation,
                message: PERMISSION_DENIED_MESSAGE,
            }
        );
    }

    #[test]
    fn test_missing_result_is_denied() {
        let results = vec![
            GrantResult::granted(Capability::ReadPhoneState),
            GrantResult::granted(Capability::CoarseLocation),
        ];
        assert_eq!(
            gate().evaluate(&results),
            GateDecision::Denied {
                capability: Capability::FineLocation,
                message: PERMISSION_DENIED_MESSAGE,
            }
        );
    }

    #[test]
    fn test_empty_results_deny_first_capability() {
        assert_eq!(
            gate().evaluate(&[]),
            GateDecision::Denied {
                capability: Capability::ReadPhoneState,
                message: PERMISSION_DENIED_MESSAGE,
            }
        );
    }

    #[test]
    fn test_has_all_reflects_platform() {
        let platform = Arc::new(SimulatedPlatform::new());
        let gate = PermissionGate::new(platform.clone());
        assert!(!gate.has_all());

        for capability in Capability::ALL {
            platform.grant(capability);
        }
        assert!(gate.has_all());
    }

    #[tokio::test]
    async fn test_acquire_reports_dialog_denial() {
        let platform = SimulatedPlatform::new().deny_on_request(Capability::FineLocation);
        let gate = PermissionGate::new(Arc::new(platform));

        assert_eq!(
            gate.acquire().await,
            GateDecision::Denied {
                capability: Capability::FineLocation,
                message: PERMISSION_DENIED_MESSAGE,
            }
        );
    }

    proptest! {
        #[test]
        fn prop_reports_first_denied_in_request_order(mask in prop::collection::vec(any::<bool>(), 5)) {
            let results: Vec<GrantResult> = Capability::ALL
                .into_iter()
                .zip(mask.iter())
                .map(|(capability, granted)| GrantResult { capability, granted: *granted })
                .collect();

            let decision = gate().evaluate(&results);
            match results.iter().find(|r| !r.granted) {
                Some(first) => prop_assert_eq!(
                    decision,
                    GateDecision::Denied { capability: first.capability, message: PERMISSION_DENIED_MESSAGE }
                ),
                None => prop_assert_eq!(decision, GateDecision::Proceed),
            }
        }
    }
}
