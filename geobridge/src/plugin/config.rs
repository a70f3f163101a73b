//! Plugin configuration.

use std::time::Duration;

use crate::sdk::SessionOptions;

/// Default deadline for one acquisition request (in seconds).
///
/// Covers the native scan only; time spent in the grant dialog is not
/// counted.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration fixed when the plugin is constructed.
#[derive(Clone, Debug)]
pub struct PluginConfig {
    /// Options applied to the native client on first use.
    pub session: SessionOptions,

    /// Deadline for a started scan to deliver its event.
    pub request_timeout: Duration,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            session: SessionOptions::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl PluginConfig {
    pub fn with_session_options(mut self, options: SessionOptions) -> Self {
        self.session = options;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PluginConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.session.is_single_shot());
    }

    #[test]
    fn test_builder() {
        let config = PluginConfig::default().with_request_timeout(Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_millis(250));
    }
}
