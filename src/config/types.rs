//! Paths, timeouts and interface list for a device

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::env::{DefaultEnvSource, EnvSource};

/// Default settings folder on the device
pub const DEFAULT_CONFIG_DIR: &str = "/etc/settings";
/// Default settings filename inside the config folder
pub const DEFAULT_SETTINGS_FILE: &str = "settings_config.ini";
/// Default local backup of the settings folder
pub const DEFAULT_BACKUP_CONFIG_PATH: &str = "/userdata/.backup_settings_config.tpc";
/// Default OS password-hash file
pub const DEFAULT_USER_CONFIG_PATH: &str = "/etc/shadow";
/// Default backup of the password-hash entries
pub const DEFAULT_BACKUP_USER_CONFIG_PATH: &str = "/userdata/.backup_shadow";
/// Default filename for user-initiated exports
pub const DEFAULT_EXPORT_FILENAME: &str = "export_settings_config.tpc";
/// Directory the network stack scans for offline provisioning files
pub const DEFAULT_PROVISIONING_DIR: &str = "/var/lib/connman";
/// Directory provisioning files are staged in before being moved into place
pub const DEFAULT_PROVISIONING_STAGING_DIR: &str = "/userdata";
/// Advisory lock held for the duration of an import/export/restore
pub const DEFAULT_LOCK_PATH: &str = "/tmp/.restore.lock";

/// Configuration for a device's settings store and restore pipeline
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Directory holding the settings file (archived whole on export)
    pub config_dir: PathBuf,

    /// Filename of the settings file inside `config_dir`
    pub settings_file: String,

    /// Application version (written to export manifests)
    pub app_version: String,

    /// Fixed local backup path
    pub backup_config_path: PathBuf,

    /// Shadow-format password file
    pub user_config_path: PathBuf,

    /// Backup of the password-hash entries
    pub backup_user_config_path: PathBuf,

    /// Default filename for exports
    pub export_filename: String,

    /// Parent directory for scratch extraction; `None` uses the system temp dir
    pub scratch_dir: Option<PathBuf>,

    pub provisioning_dir: PathBuf,
    pub provisioning_staging_dir: PathBuf,

    pub lock_path: PathBuf,

    /// Ethernet interfaces reconciled on import, in order
    pub interfaces: Vec<String>,

    /// How long to wait for an interface to come online
    pub network_wait_timeout: Duration,

    /// Interval between online checks
    pub network_poll_interval: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            settings_file: DEFAULT_SETTINGS_FILE.into(),
            app_version: env!("CARGO_PKG_VERSION").into(),
            backup_config_path: PathBuf::from(DEFAULT_BACKUP_CONFIG_PATH),
            user_config_path: PathBuf::from(DEFAULT_USER_CONFIG_PATH),
            backup_user_config_path: PathBuf::from(DEFAULT_BACKUP_USER_CONFIG_PATH),
            export_filename: DEFAULT_EXPORT_FILENAME.into(),
            scratch_dir: None,
            provisioning_dir: PathBuf::from(DEFAULT_PROVISIONING_DIR),
            provisioning_staging_dir: PathBuf::from(DEFAULT_PROVISIONING_STAGING_DIR),
            lock_path: PathBuf::from(DEFAULT_LOCK_PATH),
            interfaces: vec!["eth0".into(), "eth1".into()],
            network_wait_timeout: Duration::from_secs(5),
            network_poll_interval: Duration::from_secs(1),
        }
    }
}

impl DeviceConfig {
    /// Create a new builder for DeviceConfig
    ///
    /// # Example
    /// ```rust
    /// use devconf::DeviceConfig;
    ///
    /// let config = DeviceConfig::builder("1.4.2")
    ///     .config_dir("~/.local/share/devconf")
    ///     .interfaces(["eth0"])
    ///     .build();
    /// assert!(config.settings_path().ends_with("settings_config.ini"));
    /// ```
    pub fn builder(app_version: impl Into<String>) -> DeviceConfigBuilder {
        DeviceConfigBuilder::new(app_version)
    }

    /// Full path to the live settings file
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(&self.settings_file)
    }

    /// Path of an export written into `dir` under the default filename
    pub fn export_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.export_filename)
    }

    /// Final location of the offline provisioning file for `iface`
    pub fn provisioning_path(&self, iface: &str) -> PathBuf {
        self.provisioning_dir.join(format!("{iface}_default.config"))
    }

    /// Staging location of the offline provisioning file for `iface`
    pub fn provisioning_staging_path(&self, iface: &str) -> PathBuf {
        self.provisioning_staging_dir
            .join(format!(".tmp_{iface}_default.config"))
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: PathBuf) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(&path));
        }
    }
    path
}

/// Builder for creating DeviceConfig with a fluent API
#[derive(Clone)]
pub struct DeviceConfigBuilder {
    config: DeviceConfig,
    env_prefix: Option<String>,
    env_source: Arc<dyn EnvSource>,
}

impl std::fmt::Debug for DeviceConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceConfigBuilder")
            .field("config", &self.config)
            .field("env_prefix", &self.env_prefix)
            .finish_non_exhaustive()
    }
}

impl DeviceConfigBuilder {
    pub fn new(app_version: impl Into<String>) -> Self {
        Self {
            config: DeviceConfig {
                app_version: app_version.into(),
                ..DeviceConfig::default()
            },
            env_prefix: None,
            env_source: Arc::new(DefaultEnvSource),
        }
    }

    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config_dir = expand_home(path.into());
        self
    }

    /// Set the settings filename (default: "settings_config.ini")
    pub fn settings_file(mut self, filename: impl Into<String>) -> Self {
        self.config.settings_file = filename.into();
        self
    }

    pub fn backup_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backup_config_path = expand_home(path.into());
        self
    }

    pub fn user_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.user_config_path = expand_home(path.into());
        self
    }

    pub fn backup_user_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backup_user_config_path = expand_home(path.into());
        self
    }

    pub fn export_filename(mut self, filename: impl Into<String>) -> Self {
        self.config.export_filename = filename.into();
        self
    }

    /// Extract imports under this directory instead of the system temp dir
    pub fn scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = Some(expand_home(path.into()));
        self
    }

    pub fn provisioning_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.provisioning_dir = expand_home(path.into());
        self
    }

    pub fn provisioning_staging_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.provisioning_staging_dir = expand_home(path.into());
        self
    }

    pub fn lock_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.lock_path = expand_home(path.into());
        self
    }

    /// Replace the list of ethernet interfaces reconciled on import
    pub fn interfaces<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.interfaces = interfaces.into_iter().map(Into::into).collect();
        self
    }

    /// Bound the online wait for each interface
    pub fn network_wait(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.config.network_wait_timeout = timeout;
        self.config.network_poll_interval = poll_interval;
        self
    }

    /// Enable environment variable overrides
    ///
    /// Paths can then be overridden with `{PREFIX}_CONFIG_DIR`,
    /// `{PREFIX}_BACKUP_CONFIG_PATH`, `{PREFIX}_USER_CONFIG_PATH`,
    /// `{PREFIX}_BACKUP_USER_CONFIG_PATH`, `{PREFIX}_PROVISIONING_DIR` and
    /// `{PREFIX}_LOCK_PATH`. Overrides win over builder values.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Use a custom environment source (for testing)
    pub fn with_env_source(mut self, source: Arc<dyn EnvSource>) -> Self {
        self.env_source = source;
        self
    }

    /// Build the DeviceConfig
    pub fn build(self) -> DeviceConfig {
        let mut config = self.config;
        let Some(prefix) = self.env_prefix else {
            return config;
        };

        let lookup = |name: &str| -> Option<PathBuf> {
            let var = format!("{}_{name}", prefix.to_uppercase());
            let value = self.env_source.var(&var).ok()?;
            if value.is_empty() {
                return None;
            }
            log::debug!("{var} overrides configured path");
            Some(expand_home(PathBuf::from(value)))
        };

        if let Some(p) = lookup("CONFIG_DIR") {
            config.config_dir = p;
        }
        if let Some(p) = lookup("BACKUP_CONFIG_PATH") {
            config.backup_config_path = p;
        }
        if let Some(p) = lookup("USER_CONFIG_PATH") {
            config.user_config_path = p;
        }
        if let Some(p) = lookup("BACKUP_USER_CONFIG_PATH") {
            config.backup_user_config_path = p;
        }
        if let Some(p) = lookup("PROVISIONING_DIR") {
            config.provisioning_dir = p;
        }
        if let Some(p) = lookup("LOCK_PATH") {
            config.lock_path = p;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<String, String>);

    impl EnvSource for MapEnv {
        fn var(&self, key: &str) -> std::result::Result<String, std::env::VarError> {
            self.0.get(key).cloned().ok_or(std::env::VarError::NotPresent)
        }
    }

    #[test]
    fn test_defaults_match_device_layout() {
        let config = DeviceConfig::default();

        assert_eq!(
            config.settings_path(),
            PathBuf::from("/etc/settings/settings_config.ini")
        );
        assert_eq!(
            config.provisioning_path("eth1"),
            PathBuf::from("/var/lib/connman/eth1_default.config")
        );
        assert_eq!(
            config.provisioning_staging_path("eth0"),
            PathBuf::from("/userdata/.tmp_eth0_default.config")
        );
        assert_eq!(config.interfaces, vec!["eth0", "eth1"]);
        assert_eq!(config.network_wait_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_with_options() {
        let config = DeviceConfig::builder("2.0.0")
            .config_dir("/data/settings")
            .settings_file("device.ini")
            .export_filename("out.tpc")
            .interfaces(["eth0"])
            .build();

        assert_eq!(config.app_version, "2.0.0");
        assert_eq!(config.settings_path(), PathBuf::from("/data/settings/device.ini"));
        assert_eq!(
            config.export_path(Path::new("/media/usb")),
            PathBuf::from("/media/usb/out.tpc")
        );
        assert_eq!(config.interfaces, vec!["eth0"]);
    }

    #[test]
    fn test_tilde_expansion() {
        let config = DeviceConfig::builder("1.0.0").config_dir("~/settings").build();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.config_dir, home.join("settings"));
        }
    }

    #[test]
    fn test_env_overrides_paths() {
        let env = MapEnv(HashMap::from([
            ("TPC_CONFIG_DIR".to_string(), "/mnt/cfg".to_string()),
            ("TPC_LOCK_PATH".to_string(), "/run/restore.lock".to_string()),
            ("TPC_USER_CONFIG_PATH".to_string(), String::new()),
        ]));

        let config = DeviceConfig::builder("1.0.0")
            .config_dir("/ignored")
            .with_env_prefix("tpc")
            .with_env_source(Arc::new(env))
            .build();

        assert_eq!(config.config_dir, PathBuf::from("/mnt/cfg"));
        assert_eq!(config.lock_path, PathBuf::from("/run/restore.lock"));
        assert_eq!(config.user_config_path, PathBuf::from(DEFAULT_USER_CONFIG_PATH));
    }
}
