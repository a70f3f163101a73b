//! CLI command implementations.
//!
//! - [`capabilities`] - List the required capability set
//! - [`config`] - Configuration management (path, show, init)
//! - [`locate`] - Run one `getCurrentPosition` request

pub mod capabilities;
pub mod config;
pub mod locate;
