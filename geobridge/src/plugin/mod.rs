//! The location plugin: command dispatch over gate, session and channel.
//!
//! # Flow
//!
//! ```text
//! execute("getCurrentPosition", channel)
//!   │
//!   ├─ capabilities granted ──► Pending ──► spawn acquire
//!   │
//!   └─ capabilities missing ──► spawn { grant dialog
//!                                         ├─ denied ──► PermissionDenied
//!                                         └─ granted ─► acquire }
//!
//! acquire:
//!   session.start(request, completion)
//!   select! {
//!       completion resolved ──► Ok | Error (translation)
//!       deadline expired   ──► abort + Error (timeout)
//!       plugin shut down   ──► abort + Error (shutdown)
//!   }
//! ```
//!
//! Each request owns its completion handle, so a result can only reach the
//! channel of the request that started the scan.

mod command;
mod config;

pub use command::Command;
pub use config::{PluginConfig, DEFAULT_REQUEST_TIMEOUT_SECS};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::channel::{CallbackChannel, ResultEnvelope};
use crate::permission::{GateDecision, PermissionGate, PermissionPlatform};
use crate::sdk::LocationClientFactory;
use crate::session::{LocationSession, RequestId};

/// Error text sent to requests cut short by [`LocationPlugin::shutdown`].
pub const SHUTDOWN_MESSAGE: &str = "location plugin is shutting down";

/// Errors raised while constructing the plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No Tokio runtime to run requests on.
    #[error("no Tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Single-shot location plugin.
pub struct LocationPlugin {
    gate: PermissionGate,
    session: LocationSession,
    request_timeout: Duration,
    runtime: Handle,
    next_request: AtomicU64,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for LocationPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationPlugin")
            .field("gate", &self.gate)
            .field("session", &self.session)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl LocationPlugin {
    /// Create a plugin on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a runtime.
    pub fn new(
        config: PluginConfig,
        platform: Arc<dyn PermissionPlatform>,
        factory: Arc<dyn LocationClientFactory>,
    ) -> Result<Arc<Self>, PluginError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(config, platform, factory, runtime))
    }

    /// Create a plugin that spawns its requests on `runtime`.
    pub fn with_runtime(
        config: PluginConfig,
        platform: Arc<dyn PermissionPlatform>,
        factory: Arc<dyn LocationClientFactory>,
        runtime: Handle,
    ) -> Arc<Self> {
        Arc::new(Self {
            gate: PermissionGate::new(platform),
            session: LocationSession::new(factory, config.session),
            request_timeout: config.request_timeout,
            runtime,
            next_request: AtomicU64::new(1),
            shutdown: CancellationToken::new(),
        })
    }

    pub fn session(&self) -> &LocationSession {
        &self.session
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    /// Dispatch a command.
    ///
    /// Returns `false` for unrecognised actions; nothing is sent on the
    /// channel in that case.
    pub fn execute(self: &Arc<Self>, action: &str, channel: CallbackChannel) -> bool {
        let Some(command) = Command::parse(action) else {
            debug!(action, "Unrecognised command, not handled");
            return false;
        };

        info!(command = %command, "Executing command");
        match command {
            Command::GetCurrentPosition => self.get_current_position(channel),
        }
        true
    }

    /// Cancel every outstanding request. Later commands fail immediately.
    pub fn shutdown(&self) {
        info!("Shutting down location plugin");
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn get_current_position(self: &Arc<Self>, channel: CallbackChannel) {
        if self.is_shut_down() {
            channel.send_terminal(ResultEnvelope::error(SHUTDOWN_MESSAGE));
            return;
        }

        let plugin = Arc::clone(self);

        if self.gate.has_all() {
            channel.send_pending();
            self.runtime.spawn(async move {
                plugin.acquire(&channel).await;
            });
            return;
        }

        info!("Required capabilities missing, requesting grant");
        self.runtime.spawn(async move {
            let decision = tokio::select! {
                _ = plugin.shutdown.cancelled() => {
                    channel.send_terminal(ResultEnvelope::error(SHUTDOWN_MESSAGE));
                    return;
                }
                decision = plugin.gate.acquire() => decision,
            };

            match decision {
                GateDecision::Proceed => plugin.acquire(&channel).await,
                GateDecision::Denied {
                    capability,
                    message,
                } => {
                    channel.send_terminal(ResultEnvelope::permission_denied(capability, message));
                }
            }
        });
    }

    async fn acquire(&self, channel: &CallbackChannel) {
        let request = RequestId::new(self.next_request.fetch_add(1, Ordering::Relaxed));
        let (completion, result) = oneshot::channel();

        if let Err(e) = self.session.start(request, completion) {
            error!(request = %request, error = %e, "Failed to start location scan");
            channel.send_terminal(ResultEnvelope::error(e.to_string()));
            return;
        }

        let envelope = tokio::select! {
            _ = self.shutdown.cancelled() => {
                self.session.abort(request);
                ResultEnvelope::error(SHUTDOWN_MESSAGE)
            }
            outcome = tokio::time::timeout(self.request_timeout, result) => match outcome {
                Ok(Ok(envelope)) => envelope,
                Ok(Err(_)) => {
                    warn!(request = %request, "Completion handle dropped without a result");
                    ResultEnvelope::error("location request was abandoned")
                }
                Err(_) => {
                    warn!(
                        request = %request,
                        timeout = ?self.request_timeout,
                        "Location request timed out"
                    );
                    self.session.abort(request);
                    ResultEnvelope::error(format!(
                        "location request timed out after {:?}",
                        self.request_timeout
                    ))
                }
            },
        };

        debug!(request = %request, status = ?envelope.status, "Request finished");
        channel.send_terminal(envelope);
    }
}
