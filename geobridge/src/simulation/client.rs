//! In-process location client with scripted events.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::sdk::{
    LocationClient, LocationClientFactory, LocationListener, RawLocationEvent, SdkError,
    SessionOptions,
};

/// When a started client delivers its scripted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// On a worker thread, without delay.
    Immediate,
    /// On a worker thread, after the given delay.
    After(Duration),
    /// Never; the request hangs until aborted.
    Never,
}

type EventQueue = Arc<Mutex<VecDeque<RawLocationEvent>>>;

/// Scripted native client.
///
/// Each start pops one event from the shared queue and hands it to every
/// registered listener from a separate thread, like the native SDK's own
/// worker.
pub struct SimulatedClient {
    delivery: Delivery,
    events: EventQueue,
    options: Mutex<Option<SessionOptions>>,
    listeners: Mutex<Vec<LocationListener>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl std::fmt::Debug for SimulatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedClient")
            .field("delivery", &self.delivery)
            .field("starts", &self.start_count())
            .field("stops", &self.stop_count())
            .finish_non_exhaustive()
    }
}

impl SimulatedClient {
    fn new(delivery: Delivery, events: EventQueue) -> Self {
        Self {
            delivery,
            events,
            options: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    /// Deliver `event` to every listener on the calling thread.
    pub fn deliver(&self, event: RawLocationEvent) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener(event.clone());
        }
    }

    pub fn options(&self) -> Option<SessionOptions> {
        self.options.lock().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl LocationClient for SimulatedClient {
    fn set_options(&self, options: &SessionOptions) {
        *self.options.lock() = Some(options.clone());
    }

    fn register_listener(&self, listener: LocationListener) {
        self.listeners.lock().push(listener);
    }

    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);

        let delay = match self.delivery {
            Delivery::Never => return,
            Delivery::Immediate => Duration::ZERO,
            Delivery::After(delay) => delay,
        };

        let Some(event) = self.events.lock().pop_front() else {
            debug!("No scripted location event queued");
            return;
        };
        let listeners = self.listeners.lock().clone();

        let spawned = std::thread::Builder::new()
            .name("location-sdk-worker".to_string())
            .spawn(move || {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                for listener in listeners {
                    listener(event.clone());
                }
            });

        if let Err(e) = spawned {
            warn!(error = %e, "Failed to spawn simulated SDK worker");
        }
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory for [`SimulatedClient`]s sharing one scripted event queue.
pub struct SimulatedClientFactory {
    delivery: Delivery,
    events: EventQueue,
    failure: Option<String>,
    clients: Mutex<Vec<Arc<SimulatedClient>>>,
}

impl std::fmt::Debug for SimulatedClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedClientFactory")
            .field("delivery", &self.delivery)
            .field("created", &self.created_count())
            .finish_non_exhaustive()
    }
}

impl SimulatedClientFactory {
    pub fn new(delivery: Delivery) -> Self {
        Self {
            delivery,
            events: Arc::new(Mutex::new(VecDeque::new())),
            failure: None,
            clients: Mutex::new(Vec::new()),
        }
    }

    /// A factory whose client construction always fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(Delivery::Never)
        }
    }

    /// Queue an event for a future start.
    pub fn push_event(&self, event: RawLocationEvent) {
        self.events.lock().push_back(event);
    }

    pub fn created_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// The first client created, if any.
    pub fn client(&self) -> Option<Arc<SimulatedClient>> {
        self.clients.lock().first().cloned()
    }
}

impl LocationClientFactory for SimulatedClientFactory {
    fn create(&self) -> Result<Arc<dyn LocationClient>, SdkError> {
        if let Some(reason) = &self.failure {
            return Err(SdkError::Creation(reason.clone()));
        }

        let client = Arc::new(SimulatedClient::new(self.delivery, Arc::clone(&self.events)));
        self.clients.lock().push(Arc::clone(&client));

        let client: Arc<dyn LocationClient> = client;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{FixCommon, SourceReading};
    use std::sync::mpsc;

    fn offline_event() -> RawLocationEvent {
        RawLocationEvent::new(
            FixCommon {
                time: 0,
                latitude: 1.0,
                longitude: 2.0,
                radius: 3.0,
                location_describe: None,
                poi_list: None,
            },
            SourceReading::Offline,
        )
    }

    #[test]
    fn test_start_delivers_on_worker_thread() {
        let factory = SimulatedClientFactory::new(Delivery::Immediate);
        factory.push_event(offline_event());
        let client = factory.create().unwrap();

        let (tx, rx) = mpsc::channel();
        let caller = std::thread::current().id();
        client.register_listener(Arc::new(move |event| {
            let _ = tx.send((std::thread::current().id(), event));
        }));
        client.start();

        let (thread, event) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_ne!(thread, caller);
        assert_eq!(event, offline_event());
    }

    #[test]
    fn test_never_delivery_counts_start() {
        let factory = SimulatedClientFactory::new(Delivery::Never);
        factory.push_event(offline_event());
        factory.create().unwrap().start();

        let client = factory.client().unwrap();
        assert_eq!(client.start_count(), 1);
        assert_eq!(client.stop_count(), 0);
    }

    #[test]
    fn test_failing_factory() {
        let factory = SimulatedClientFactory::failing("no context");
        assert_eq!(
            factory.create().err(),
            Some(SdkError::Creation("no context".to_string()))
        );
        assert_eq!(factory.created_count(), 0);
    }
}
