//! Asynchronous result channel.
//!
//! # Protocol
//!
//! ```text
//! capabilities granted:   Pending(keepChannelOpen) ... Ok | Error
//! capabilities missing:   ... Ok | Error | PermissionDenied
//! unrecognised command:   (no envelope, execute() returns false)
//! ```

mod callback;
mod envelope;

pub use callback::{CallbackChannel, ResultSink};
pub use envelope::{EnvelopeStatus, ResultEnvelope};
