//! Per-invocation callback channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::envelope::ResultEnvelope;

/// Transport that carries envelopes back to the caller.
pub trait ResultSink: Send + Sync {
    fn deliver(&self, envelope: ResultEnvelope);
}

impl ResultSink for mpsc::UnboundedSender<ResultEnvelope> {
    fn deliver(&self, envelope: ResultEnvelope) {
        if self.send(envelope).is_err() {
            debug!("Result receiver dropped, envelope discarded");
        }
    }
}

struct ChannelInner {
    sink: Box<dyn ResultSink>,
    terminal_sent: AtomicBool,
}

/// The callback channel of one triggering command.
///
/// Enforces the protocol: any number of pending acknowledgements before the
/// terminal message, and at most one terminal message. Cloning shares the
/// same channel.
#[derive(Clone)]
pub struct CallbackChannel {
    inner: Arc<ChannelInner>,
}

impl std::fmt::Debug for CallbackChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackChannel")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl CallbackChannel {
    pub fn new(sink: impl ResultSink + 'static) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                sink: Box::new(sink),
                terminal_sent: AtomicBool::new(false),
            }),
        }
    }

    /// Channel backed by an unbounded tokio mpsc queue.
    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<ResultEnvelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Send the interim acknowledgement. Refused once the channel is closed.
    pub fn send_pending(&self) -> bool {
        if self.is_closed() {
            warn!("Pending acknowledgement after terminal message, dropped");
            return false;
        }
        self.inner.sink.deliver(ResultEnvelope::pending());
        true
    }

    /// Send the terminal message. Only the first call delivers.
    pub fn send_terminal(&self, envelope: ResultEnvelope) -> bool {
        debug_assert!(envelope.is_terminal(), "terminal send with pending status");

        if self.inner.terminal_sent.swap(true, Ordering::AcqRel) {
            warn!(status = ?envelope.status, "Duplicate terminal message dropped");
            return false;
        }
        self.inner.sink.deliver(envelope);
        true
    }

    /// Whether the terminal message has been sent.
    pub fn is_closed(&self) -> bool {
        self.inner.terminal_sent.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::EnvelopeStatus;
    use serde_json::json;

    #[test]
    fn test_pending_then_terminal() {
        let (channel, mut rx) = CallbackChannel::unbounded();

        assert!(channel.send_pending());
        assert!(channel.send_terminal(ResultEnvelope::ok(json!({"latitude": 1.0}))));

        assert_eq!(rx.try_recv().unwrap().status, EnvelopeStatus::Pending);
        assert_eq!(rx.try_recv().unwrap().status, EnvelopeStatus::Ok);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_second_terminal_dropped() {
        let (channel, mut rx) = CallbackChannel::unbounded();

        assert!(channel.send_terminal(ResultEnvelope::error("first")));
        assert!(!channel.send_terminal(ResultEnvelope::error("second")));

        assert_eq!(rx.try_recv().unwrap().error_message(), Some("first"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_pending_after_terminal_refused() {
        let (channel, mut rx) = CallbackChannel::unbounded();
        channel.send_terminal(ResultEnvelope::error("done"));

        assert!(!channel.send_pending());
        assert!(channel.is_closed());
        assert_eq!(rx.try_recv().unwrap().status, EnvelopeStatus::Error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clones_share_terminal_state() {
        let (channel, _rx) = CallbackChannel::unbounded();
        let clone = channel.clone();

        assert!(clone.send_terminal(ResultEnvelope::error("x")));
        assert!(channel.is_closed());
        assert!(!channel.send_terminal(ResultEnvelope::error("y")));
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (channel, rx) = CallbackChannel::unbounded();
        drop(rx);
        assert!(channel.send_terminal(ResultEnvelope::error("nobody listening")));
    }
}
