//! Common test utilities for devconf integration tests
//!
//! Provides a throwaway device: its own directory tree, settings schema and
//! in-memory live system.

#![allow(dead_code)]

use devconf::live::MemoryLive;
use devconf::{ConfigSchema, DeviceConfig, RestoreOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const SHADOW: &str = "root:$6$rootsalt$roothash:19000:0:99999:7:::\n\
                          weston:$6$westonsalt$westonhash:19000:0:99999:7:::\n";

/// Route `log` output through the test harness; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One simulated device rooted in a temp directory
pub struct TestDevice {
    pub temp_dir: TempDir,
    pub config: DeviceConfig,
    pub schema: Arc<ConfigSchema>,
    pub live: MemoryLive,
    pub orchestrator: Arc<RestoreOrchestrator>,
}

impl TestDevice {
    pub fn new() -> Self {
        Self::with_live(MemoryLive::new())
    }

    pub fn with_live(live: MemoryLive) -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let config = DeviceConfig::builder("1.0.0")
            .config_dir(root.join("etc/settings"))
            .backup_config_path(root.join("userdata/.backup_settings_config.tpc"))
            .user_config_path(root.join("etc/shadow"))
            .backup_user_config_path(root.join("userdata/.backup_shadow"))
            .scratch_dir(root.join("tmp"))
            .provisioning_dir(root.join("var/lib/connman"))
            .provisioning_staging_dir(root.join("userdata"))
            .lock_path(root.join("tmp/.restore.lock"))
            .network_wait(Duration::from_millis(20), Duration::from_millis(5))
            .build();

        std::fs::create_dir_all(root.join("etc")).expect("Failed to create etc");
        std::fs::write(&config.user_config_path, SHADOW).expect("Failed to write shadow");

        let schema = Arc::new(
            ConfigSchema::open(config.settings_path()).expect("Failed to open settings"),
        );
        let orchestrator = Arc::new(RestoreOrchestrator::new(config.clone(), live.live()));

        Self {
            temp_dir,
            config,
            schema,
            live,
            orchestrator,
        }
    }

    /// A path inside this device's directory
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn settings_bytes(&self) -> Vec<u8> {
        std::fs::read(self.config.settings_path()).expect("Failed to read settings")
    }

    /// Export this device's settings to a USB-like path and return it
    pub fn export(&self) -> PathBuf {
        let dst = self.path("media/usb/export_settings_config.tpc");
        let report = self.orchestrator.export_config(&dst);
        assert!(report.success, "export failed: {report}");
        dst
    }
}
