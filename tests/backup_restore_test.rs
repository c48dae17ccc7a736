//! Backup & Restore Integration Tests
//!
//! Tests for the export/import pipeline including:
//! - Importing another device's export (secret re-keying)
//! - Skipping domains the imported file has no data for
//! - Offline interfaces getting a provisioning file
//! - Local backup, corruption and restore
//! - User password backup and restore

mod common;

use common::{SHADOW, TestDevice};
use devconf::live::{MemoryLive, MemoryNetwork};
use devconf::storage::{IniStorage, StorageBackend};
use devconf::{ConfigSchema, RestoreReport};
use std::sync::Arc;

// =============================================================================
// Cross-Device Import
// =============================================================================

#[test]
fn test_import_from_other_device_rekeys_secrets() {
    let source = TestDevice::new();
    source.schema.set_login_password("Secr3t!").unwrap();
    source.schema.set_vnc_server_password("vnc-pass").unwrap();
    let source_ciphertext = source
        .schema
        .store()
        .get("security", "login_password")
        .unwrap()
        .unwrap();
    let archive = source.export();

    let target = TestDevice::new();
    let target_uuid = target.schema.get_uuid();
    assert_ne!(target_uuid, source.schema.get_uuid());

    let report = target.orchestrator.import_config(&archive, &target.schema);
    assert_eq!(report, RestoreReport::success("Success.", false));

    assert_eq!(target.schema.get_uuid(), target_uuid);
    assert_eq!(target.schema.get_login_password(), "Secr3t!");
    assert_eq!(target.schema.get_vnc_server_password(), "vnc-pass");

    let target_ciphertext = target
        .schema
        .store()
        .get("security", "login_password")
        .unwrap()
        .unwrap();
    assert_ne!(target_ciphertext, source_ciphertext);
    assert!(!String::from_utf8(target.settings_bytes()).unwrap().contains("Secr3t!"));
}

#[test]
fn test_vnc_and_login_scenario() {
    let source = TestDevice::new();
    source.schema.set_vnc_server_address("10.0.0.5").unwrap();
    source.schema.set_vnc_server_port("5900").unwrap();
    source.schema.set_login_password("Secr3t!").unwrap();
    let archive = source.export();

    let target = TestDevice::new();
    let report = target.orchestrator.import_config(&archive, &target.schema);
    assert!(report.success, "{report}");

    assert_eq!(target.schema.get_vnc_server_address(), "10.0.0.5");
    assert_eq!(target.schema.get_vnc_server_port(), "5900");
    assert_eq!(target.schema.get_login_password(), "Secr3t!");

    // Later writes use the target's own secret
    target.schema.set_ftp_server_password("after-import").unwrap();
    let reopened = ConfigSchema::open(target.config.settings_path()).unwrap();
    assert_eq!(reopened.get_uuid(), target.schema.get_uuid());
    assert_eq!(reopened.get_ftp_server_password(), "after-import");
    assert_eq!(reopened.get_login_password(), "Secr3t!");
}

// =============================================================================
// Reconciliation
// =============================================================================

#[test]
fn test_missing_domains_are_skipped() {
    let source = TestDevice::new();
    source.schema.set_brightness(80).unwrap();
    let archive = source.export();

    let target = TestDevice::new();
    let report = target.orchestrator.import_config(&archive, &target.schema);

    assert_eq!(report, RestoreReport::success("Success.", false));
    assert!(target.live.time.calls().is_empty());
    assert!(target.live.system.calls().is_empty());
    assert_eq!(target.live.screen.state().brightness, 80);
    assert_eq!(target.schema.get_brightness(), 80);
}

#[test]
fn test_online_interface_gets_static_address() {
    let source = TestDevice::new();
    source.schema.set_net_has_configured("eth0", true).unwrap();
    source
        .schema
        .set_net_static_ip("eth0", "192.168.1.5", "", "255.255.255.0", "192.168.1.1")
        .unwrap();
    source.schema.set_net_dns_server("eth0", "8.8.8.8", "").unwrap();
    let archive = source.export();

    let target = TestDevice::with_live(MemoryLive {
        network: Arc::new(MemoryNetwork::with_online(["eth0"])),
        ..MemoryLive::new()
    });
    let report = target.orchestrator.import_config(&archive, &target.schema);
    assert!(report.success, "{report}");

    let eth0 = target.live.network.interface("eth0");
    assert_eq!(eth0.method, "manual");
    assert_eq!(eth0.ipv4, "192.168.1.5");
    assert_eq!(eth0.dns, ("8.8.8.8".to_string(), String::new()));
    assert!(target.schema.get_net_has_configured("eth0"));
    assert!(!target.config.provisioning_path("eth0").exists());
}

#[test]
fn test_offline_interface_gets_provisioning_file() {
    let source = TestDevice::new();
    source.schema.set_net_has_configured("eth1", true).unwrap();
    source.schema.set_net_dhcp("eth1").unwrap();
    let archive = source.export();

    let target = TestDevice::new();
    let report = target.orchestrator.import_config(&archive, &target.schema);
    assert!(report.success, "{report}");

    assert!(!target.schema.get_net_has_configured("eth1"));
    assert_eq!(target.schema.get_net_method("eth1"), "dhcp");

    let doc = IniStorage::new()
        .read(&target.config.provisioning_path("eth1"))
        .unwrap();
    assert_eq!(doc.get("service_eth1", "IPv4"), Some("dhcp"));
    assert_eq!(doc.get("service_eth1", "DeviceName"), Some("eth1"));
    assert!(
        !target
            .live
            .network
            .calls()
            .iter()
            .any(|c| c.starts_with("set_dhcp"))
    );
}

#[test]
fn test_tampered_export_is_rejected() {
    let source = TestDevice::new();
    source.schema.set_brightness(55).unwrap();
    let archive = source.export();

    // Rebuild the archive with a settings file that no longer matches the manifest
    let unpacked = source.path("unpacked");
    std::fs::create_dir_all(&unpacked).unwrap();
    let file = std::fs::File::open(&archive).unwrap();
    tar::Archive::new(flate2::read::GzDecoder::new(file))
        .unpack(&unpacked)
        .unwrap();
    std::fs::write(unpacked.join("settings_config.ini"), "[screen]\nbrightness=1\n").unwrap();

    let tampered = source.path("tampered.tpc");
    let out = std::fs::File::create(&tampered).unwrap();
    let mut builder = tar::Builder::new(flate2::write::GzEncoder::new(
        out,
        flate2::Compression::default(),
    ));
    builder.append_dir_all(".", &unpacked).unwrap();
    builder.into_inner().unwrap().finish().unwrap();

    let target = TestDevice::new();
    let before = target.settings_bytes();
    let report = target.orchestrator.import_config(&tampered, &target.schema);

    assert!(!report.success);
    assert!(report.message.starts_with("Incorrect format of import file:"));
    assert_eq!(target.settings_bytes(), before);
    assert!(target.live.screen.calls().is_empty());
}

// =============================================================================
// Local Backup
// =============================================================================

#[test]
fn test_backup_corrupt_restore_is_byte_identical() {
    let device = TestDevice::new();
    device.schema.set_brightness(90).unwrap();
    device.schema.set_login_password("keep-me").unwrap();
    device.schema.set_timezone("Asia/Taipei").unwrap();
    device.schema.set_ntp_enable(true).unwrap();
    let before = device.settings_bytes();

    assert!(device.orchestrator.backup_config().success);
    std::fs::write(device.config.settings_path(), "[broken\n").unwrap();

    let report = device.orchestrator.restore_config_from_backup(&device.schema);
    assert!(report.success, "{report}");
    assert_eq!(device.settings_bytes(), before);
    assert_eq!(device.schema.get_login_password(), "keep-me");
    assert!(!device.config.backup_config_path.exists());
}

#[test]
fn test_plain_backup_restores_too() {
    let device = TestDevice::new();
    device.schema.set_vnc_server_address("10.9.9.9").unwrap();
    let before = device.settings_bytes();

    device.orchestrator.backups().backup_config().unwrap();
    std::fs::remove_file(device.config.settings_path()).unwrap();

    let report = device.orchestrator.restore_config_from_backup(&device.schema);
    assert!(report.success, "{report}");
    assert_eq!(device.settings_bytes(), before);
}

#[test]
fn test_restore_without_backup_fails() {
    let device = TestDevice::new();
    let report = device.orchestrator.restore_config_from_backup(&device.schema);
    assert!(!report.success);
    assert!(report.message.starts_with("Backup file:"));
}

// =============================================================================
// User Config
// =============================================================================

#[test]
fn test_user_config_backup_and_restore() {
    let device = TestDevice::new();
    assert!(!device.orchestrator.restore_user_config_from_backup());

    device.orchestrator.backups().backup_user_config().unwrap();
    std::fs::write(
        &device.config.user_config_path,
        "root:changed:19500:0:99999:7:::\nweston:changed:19500:0:99999:7:::\n",
    )
    .unwrap();

    assert!(device.orchestrator.restore_user_config_from_backup());
    let restored = std::fs::read_to_string(&device.config.user_config_path).unwrap();
    assert_eq!(
        restored,
        SHADOW.replace("19000", "19500")
    );
    assert!(!device.config.backup_user_config_path.exists());
}

#[cfg(unix)]
#[test]
fn test_user_restore_keeps_shadow_private() {
    use std::os::unix::fs::PermissionsExt;

    let device = TestDevice::new();
    let shadow = &device.config.user_config_path;
    std::fs::set_permissions(shadow, std::fs::Permissions::from_mode(0o600)).unwrap();

    device.orchestrator.backups().backup_user_config().unwrap();
    let backup_mode = std::fs::metadata(&device.config.backup_user_config_path)
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(backup_mode & 0o777, 0o600);

    assert!(device.orchestrator.restore_user_config_from_backup());
    let mode = std::fs::metadata(shadow).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    let leftovers: Vec<_> = std::fs::read_dir(shadow.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".shadow"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
}
