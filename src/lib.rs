//! # devconf - device settings store
//!
//! Persistent settings for an embedded touch-panel device, with backup,
//! export/import and restore against the live system.
//!
//! ## Features
//!
//! - **Settings Store**: INI file with section/key values, atomic writes
//! - **Secret Fields**: login, VNC and FTP passwords encrypted with a key
//!   derived from a per-device secret
//! - **Typed Schema**: one getter/setter pair per setting, tolerant of
//!   missing and damaged values
//! - **Backup & Restore**: plain copies of the settings and shadow files
//! - **Export & Import**: gzipped tar of the settings folder; an import is
//!   reconciled against the live system before it replaces the live file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devconf::{ConfigSchema, DeviceConfig, RestoreOrchestrator};
//! use devconf::live::MemoryLive;
//! use std::path::Path;
//!
//! # fn example() -> devconf::Result<()> {
//! let config = DeviceConfig::builder("1.4.2")
//!     .with_env_prefix("devconf")
//!     .build();
//!
//! let schema = ConfigSchema::open(config.settings_path())?;
//! schema.set_vnc_server_password("s3cret")?;
//! assert_eq!(schema.get_vnc_server_password(), "s3cret");
//!
//! // Production code passes collaborators backed by the OS tools
//! let orchestrator = RestoreOrchestrator::new(config, MemoryLive::new().live());
//! let report = orchestrator.import_config(Path::new("/media/usb/export_settings_config.tpc"), &schema);
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Absent vs Empty
//!
//! Reads distinguish a key that is missing from one that is present but
//! empty where the panel relies on it (page visibility, optional gestures,
//! optional ethernet/USB settings). The `*_string` getters expose the raw
//! value for those checks.

mod error;
pub mod security;
pub mod storage;
mod store;
mod sync;

pub mod backup;
pub mod config;
pub mod credentials;
pub mod live;
pub mod schema;

pub use error::{Error, Result};
pub use storage::{IniDocument, IniStorage, StorageBackend};
pub use store::{ConfigStore, parse_bool, parse_int};

pub use config::{DeviceConfig, DeviceConfigBuilder, EnvSource};
pub use credentials::{AesGcmCipher, DeviceSecret, SecretCipher, SecretField};
pub use live::LiveSystem;
pub use schema::{ConfigSchema, FirewallRule, Page, StartupApp, WebPage};

pub use backup::{BackupManager, ReconcileOutcome, RestoreOrchestrator, RestoreReport};
