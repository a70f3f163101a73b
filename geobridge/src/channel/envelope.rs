//! Result envelopes sent back to the scripting caller.

use serde::Serialize;
use serde_json::{json, Value};

use crate::permission::Capability;

/// Status carried by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvelopeStatus {
    /// Interim acknowledgement; a terminal message follows.
    Pending,
    Ok,
    Error,
    PermissionDenied,
}

impl EnvelopeStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EnvelopeStatus::Pending)
    }
}

/// One message on the callback channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub status: EnvelopeStatus,
    pub keep_channel_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ResultEnvelope {
    /// Acknowledgement that keeps the caller's channel open.
    pub fn pending() -> Self {
        Self {
            status: EnvelopeStatus::Pending,
            keep_channel_open: true,
            payload: None,
        }
    }

    pub fn ok(payload: Value) -> Self {
        Self::terminal(EnvelopeStatus::Ok, Some(payload))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::terminal(EnvelopeStatus::Error, Some(Value::String(message.into())))
    }

    pub fn permission_denied(capability: Capability, message: &str) -> Self {
        Self::terminal(
            EnvelopeStatus::PermissionDenied,
            Some(json!({
                "capability": capability.id(),
                "message": message,
            })),
        )
    }

    fn terminal(status: EnvelopeStatus, payload: Option<Value>) -> Self {
        Self {
            status,
            keep_channel_open: false,
            payload,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The error text of an `Error` envelope.
    pub fn error_message(&self) -> Option<&str> {
        match (self.status, &self.payload) {
            (EnvelopeStatus::Error, Some(Value::String(message))) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_serialization() {
        let json = serde_json::to_value(ResultEnvelope::pending()).unwrap();
        assert_eq!(json, json!({"status": "pending", "keepChannelOpen": true}));
    }

    #[test]
    fn test_permission_denied_serialization() {
        let envelope =
            ResultEnvelope::permission_denied(Capability::ReadPhoneState, "permission acquisition failed");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            json!({
                "status": "permissionDenied",
                "keepChannelOpen": false,
                "payload": {
                    "capability": "read-phone-state",
                    "message": "permission acquisition failed",
                }
            })
        );
        assert!(envelope.is_terminal());
    }

    #[test]
    fn test_error_message_accessor() {
        let envelope = ResultEnvelope::error("boom");
        assert_eq!(envelope.error_message(), Some("boom"));
        assert_eq!(ResultEnvelope::ok(json!({})).error_message(), None);
    }
}
