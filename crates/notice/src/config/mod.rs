//! Configuration loading.

mod settings;

pub use settings::{ConfigError, Settings, DEFAULT_CONFIG_FILENAME};
