//! Shared project plumbing for zkforge: configuration and logging.

pub mod config;
pub mod logging;

pub use config::{
    AccountsConfig, ConfigError, NetworkConfig, PathsConfig, ZkForgeConfig, validate_url,
};
