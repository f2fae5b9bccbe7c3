//! acr-push configuration
//!
//! A flat settings record resolved from CLI flags, `ACR_PUSH_*`
//! environment variables and an optional `.env` file.

pub mod env;
pub mod error;
pub mod settings;

pub use env::{ENV_PREFIX, EnvSource, parse_env_file};
pub use error::{ConfigError, Result};
pub use settings::{CiSettings, LogLevel, Settings, SettingsOverrides};
