//! Device configuration
//!
//! - `DeviceConfig` - every path, timeout and interface the store and the
//!   restore pipeline touch
//! - `EnvSource` - environment lookups for path overrides

mod env;
mod types;

pub use env::{DefaultEnvSource, EnvSource};
pub use types::{
    DEFAULT_BACKUP_CONFIG_PATH, DEFAULT_BACKUP_USER_CONFIG_PATH, DEFAULT_CONFIG_DIR,
    DEFAULT_EXPORT_FILENAME, DEFAULT_LOCK_PATH, DEFAULT_PROVISIONING_DIR,
    DEFAULT_PROVISIONING_STAGING_DIR, DEFAULT_SETTINGS_FILE, DEFAULT_USER_CONFIG_PATH,
    DeviceConfig, DeviceConfigBuilder,
};
