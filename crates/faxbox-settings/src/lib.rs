//! FaxBox Settings Crate
//!
//! Loads, validates and saves the generator configuration.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, OutputSettings, CONFIG_ENV};
pub use error::{ConfigError, SettingsError, SettingsResult};
