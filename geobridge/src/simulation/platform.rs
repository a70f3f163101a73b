//! In-process permission platform.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::debug;

use crate::permission::{Capability, GrantResult, PermissionPlatform};

/// Permission platform with scripted dialog answers.
///
/// Nothing is granted up front unless built with [`granting_all`]. The grant
/// dialog approves every capability except those marked with
/// [`deny_on_request`]; approved capabilities stay granted afterwards.
///
/// [`granting_all`]: SimulatedPlatform::granting_all
/// [`deny_on_request`]: SimulatedPlatform::deny_on_request
#[derive(Debug, Default)]
pub struct SimulatedPlatform {
    granted: Mutex<HashSet<Capability>>,
    refused: HashSet<Capability>,
    answer_limit: Option<usize>,
    unanswered: bool,
    requests: AtomicUsize,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every capability already granted; the dialog never shows.
    pub fn granting_all() -> Self {
        let platform = Self::new();
        for capability in Capability::ALL {
            platform.grant(capability);
        }
        platform
    }

    /// The user refuses `capability` in the grant dialog.
    pub fn deny_on_request(mut self, capability: Capability) -> Self {
        self.refused.insert(capability);
        self
    }

    /// The dialog is interrupted after answering `count` capabilities.
    pub fn interrupt_after(mut self, count: usize) -> Self {
        self.answer_limit = Some(count);
        self
    }

    /// The grant dialog stays open forever.
    pub fn unanswered(mut self) -> Self {
        self.unanswered = true;
        self
    }

    pub fn grant(&self, capability: Capability) {
        self.granted.lock().insert(capability);
    }

    pub fn revoke(&self, capability: Capability) {
        self.granted.lock().remove(&capability);
    }

    /// Number of times the grant dialog was shown.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn answer(&self, capabilities: &[Capability]) -> Vec<GrantResult> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let limit = self.answer_limit.unwrap_or(capabilities.len());

        let mut granted = self.granted.lock();
        capabilities
            .iter()
            .take(limit)
            .map(|&capability| {
                if self.refused.contains(&capability) {
                    GrantResult::denied(capability)
                } else {
                    granted.insert(capability);
                    GrantResult::granted(capability)
                }
            })
            .collect()
    }
}

impl PermissionPlatform for SimulatedPlatform {
    fn has_permission(&self, capability: Capability) -> bool {
        self.granted.lock().contains(&capability)
    }

    fn request_permissions<'a>(
        &'a self,
        capabilities: &'a [Capability],
    ) -> BoxFuture<'a, Vec<GrantResult>> {
        Box::pin(async move {
            if self.unanswered {
                self.requests.fetch_add(1, Ordering::SeqCst);
                return futures::future::pending().await;
            }
            // The dialog resolves on a later turn of the event loop.
            tokio::task::yield_now().await;
            let results = self.answer(capabilities);
            debug!(answered = results.len(), "Simulated grant dialog resolved");
            results
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dialog_grants_and_remembers() {
        let platform = SimulatedPlatform::new();
        assert!(!platform.has_permission(Capability::FineLocation));

        let results = platform.request_permissions(&Capability::ALL).await;

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.granted));
        assert!(platform.has_permission(Capability::FineLocation));
        assert_eq!(platform.request_count(), 1);
    }

    #[tokio::test]
    async fn test_refused_capability_stays_missing() {
        let platform = SimulatedPlatform::new().deny_on_request(Capability::CoarseLocation);

        let results = platform.request_permissions(&Capability::ALL).await;

        assert_eq!(results[1], GrantResult::denied(Capability::CoarseLocation));
        assert!(!platform.has_permission(Capability::CoarseLocation));
        assert!(platform.has_permission(Capability::ReadPhoneState));
    }

    #[tokio::test]
    async fn test_interrupted_dialog_truncates() {
        let platform = SimulatedPlatform::new().interrupt_after(2);
        let results = platform.request_permissions(&Capability::ALL).await;
        assert_eq!(results.len(), 2);
    }
}
