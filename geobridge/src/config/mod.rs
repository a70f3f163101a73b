//! User configuration in `~/.geobridge/config.ini`.
//!
//! ```text
//! config.ini ──► parser::parse_ini ──► ConfigFile ──► PluginConfig
//!                                          │
//!                writer::to_config_string ◄┘
//! ```
//!
//! A missing file yields defaults. Every key is optional; values present in
//! the file overlay [`ConfigFile::default`].

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LocationSettings, LoggingSettings, RequestSettings};
