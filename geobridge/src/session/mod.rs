//! Single-shot location session over one native client handle.
//!
//! # State Machine
//!
//! ```text
//! Uninitialized --[ensure_ready]--> Ready --[start]--> Running
//!                                     ^                   |
//!                                     +--[event | abort]--+
//! ```
//!
//! The native handle and its listener are created once, on the first start,
//! and reused for the life of the session. The listener does not capture the
//! request that triggered its registration: each start parks a completion
//! handle in the in-flight slot, and the listener resolves whatever request
//! occupies that slot when the event arrives.
//!
//! Every event stops the handle, whether translation succeeded or not. The
//! stop runs from a drop guard, so it also runs if translation panics.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::channel::ResultEnvelope;
use crate::sdk::{LocationClient, LocationClientFactory, RawLocationEvent, SdkError, SessionOptions};
use crate::translate::EventTranslator;

/// Identifier of one acquisition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Completion handle resolved with the request's terminal envelope.
pub type Completion = oneshot::Sender<ResultEnvelope>;

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No native handle yet.
    Uninitialized,
    /// Handle configured, not scanning.
    Ready,
    /// A scan is in progress.
    Running,
}

/// Errors raised when starting a scan.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A scan is already running.
    #[error("location session is already running")]
    Busy,

    /// The native handle could not be created.
    #[error(transparent)]
    Client(#[from] SdkError),
}

struct InFlight {
    id: RequestId,
    completion: Completion,
}

struct SessionInner {
    state: SessionState,
    client: Option<Arc<dyn LocationClient>>,
    in_flight: Option<InFlight>,
}

struct SessionShared {
    factory: Arc<dyn LocationClientFactory>,
    options: SessionOptions,
    translator: EventTranslator,
    inner: Mutex<SessionInner>,
}

/// Owns at most one native location client handle.
pub struct LocationSession {
    shared: Arc<SessionShared>,
}

impl fmt::Debug for LocationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationSession")
            .field("state", &self.state())
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl LocationSession {
    /// Create an uninitialized session. No native handle is built until the
    /// first start.
    pub fn new(factory: Arc<dyn LocationClientFactory>, options: SessionOptions) -> Self {
        Self {
            shared: Arc::new(SessionShared {
                factory,
                options,
                translator: EventTranslator::new(),
                inner: Mutex::new(SessionInner {
                    state: SessionState::Uninitialized,
                    client: None,
                    in_flight: None,
                }),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.inner.lock().state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.shared.options
    }

    /// The request currently waiting for an event, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.shared.inner.lock().in_flight.as_ref().map(|f| f.id)
    }

    /// Build, configure and listen to the native handle if not done yet.
    ///
    /// Idempotent: later calls return the existing handle.
    pub fn ensure_ready(&self) -> Result<(), SessionError> {
        let mut inner = self.shared.inner.lock();
        SessionShared::ensure_ready(&self.shared, &mut inner).map(|_| ())
    }

    /// Begin a single-shot scan for `request`.
    ///
    /// The completion handle is resolved by the listener with the
    /// translated result, or dropped if the request is aborted.
    pub fn start(&self, request: RequestId, completion: Completion) -> Result<(), SessionError> {
        let client = {
            let mut inner = self.shared.inner.lock();
            if inner.state == SessionState::Running {
                warn!(request = %request, "Start refused, a scan is already running");
                return Err(SessionError::Busy);
            }

            let client = SessionShared::ensure_ready(&self.shared, &mut inner)?;
            inner.state = SessionState::Running;
            inner.in_flight = Some(InFlight {
                id: request,
                completion,
            });
            client
        };

        // The client may deliver synchronously from start(), so the lock
        // must not be held here.
        info!(request = %request, "Starting location scan");
        client.start();
        Ok(())
    }

    /// Stop the scan. Returns false if the session was not running.
    pub fn stop(&self) -> bool {
        self.shared.stop()
    }

    /// Abandon `request` and force-stop the handle.
    ///
    /// Does nothing when `request` is no longer in flight (its event has
    /// already been handled).
    pub fn abort(&self, request: RequestId) -> bool {
        let matched = {
            let mut inner = self.shared.inner.lock();
            match &inner.in_flight {
                Some(in_flight) if in_flight.id == request => {
                    inner.in_flight = None;
                    true
                }
                _ => false,
            }
        };

        if matched {
            warn!(request = %request, "Aborting location request");
            self.shared.stop();
        }
        matched
    }

    /// Handle one raw event as the registered listener would.
    pub fn on_event(&self, event: RawLocationEvent) {
        self.shared.on_event(event);
    }
}

impl SessionShared {
    fn ensure_ready(
        this: &Arc<Self>,
        inner: &mut SessionInner,
    ) -> Result<Arc<dyn LocationClient>, SessionError> {
        if let Some(client) = &inner.client {
            return Ok(Arc::clone(client));
        }

        let client = this.factory.create()?;
        client.set_options(&this.options);

        let session: Weak<SessionShared> = Arc::downgrade(this);
        client.register_listener(Arc::new(move |event| match session.upgrade() {
            Some(shared) => shared.on_event(event),
            None => debug!("Location event after session dropped, ignored"),
        }));

        info!(
            mode = %this.options.mode(),
            coordinate_system = %this.options.coordinate_system(),
            scan_interval_ms = this.options.scan_interval_ms(),
            "Location client created and configured"
        );

        inner.client = Some(Arc::clone(&client));
        inner.state = SessionState::Ready;
        Ok(client)
    }

    fn stop(&self) -> bool {
        let client = {
            let mut inner = self.inner.lock();
            if inner.state != SessionState::Running {
                return false;
            }
            inner.state = SessionState::Ready;
            inner.client.clone()
        };

        if let Some(client) = client {
            client.stop();
        }
        debug!("Location scan stopped");
        true
    }

    fn on_event(&self, event: RawLocationEvent) {
        let source = event.location_source();

        // The handle is released before the requester is resumed.
        let (in_flight, envelope) = {
            let _release = ReleaseGuard(self);
            let in_flight = self.inner.lock().in_flight.take();

            let envelope = match self.translator.translate(&event) {
                Ok(payload) => ResultEnvelope::ok(payload),
                Err(e) => {
                    error!(error = %e, loc_type = source.code(), "Failed to translate location event");
                    ResultEnvelope::error(e.to_string())
                }
            };
            (in_flight, envelope)
        };

        match in_flight {
            Some(InFlight { id, completion }) => {
                if completion.send(envelope).is_err() {
                    warn!(request = %id, "Requester gone, location result discarded");
                } else {
                    debug!(request = %id, source = source.tag(), "Location result delivered");
                }
            }
            None => {
                warn!(
                    loc_type = source.code(),
                    "Location event with no request in flight, discarded"
                );
            }
        }
    }
}

/// Stops the session when dropped.
struct ReleaseGuard<'a>(&'a SessionShared);

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}
