//! Apply an imported settings file to the live system, one domain at a time
//!
//! Each reconciler reads the imported schema, pushes what it finds to the
//! live collaborators and reports whether a reboot is needed. A failed live
//! call never aborts a domain: it is logged, recorded as an issue and the
//! remaining calls still run.

use super::types::ReconcileOutcome;
use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::live::{LiveSystem, ProvisioningFile, wait_until};
use crate::schema::{ConfigSchema, NetSettings};
use log::{debug, info, warn};

/// Gesture type on which imported gesture flags are applied
const GESTURE_TYPE_GENERAL: &str = "general";

const BRIGHTNESS_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

/// Collects soft failures for one domain
struct Issues {
    domain: &'static str,
    issues: Vec<String>,
}

impl Issues {
    fn new(domain: &'static str) -> Self {
        Self {
            domain,
            issues: Vec::new(),
        }
    }

    fn check(&mut self, what: &str, result: Result<()>) {
        if let Err(e) = result {
            let issue = Error::PartialReconciliation {
                domain: self.domain.to_string(),
                reason: format!("{what}: {e}"),
            };
            warn!("{issue}");
            self.issues.push(format!("{}: {what}", self.domain));
        }
    }

    fn finish(self, needs_reboot: bool) -> ReconcileOutcome {
        ReconcileOutcome::from_issues(needs_reboot, self.issues)
    }
}

/// Brightness, screensaver, cursor, gestures, top bar and rotation
pub fn reconcile_screen(imported: &ConfigSchema, live: &LiveSystem) -> ReconcileOutcome {
    let brightness = imported.get_brightness();
    if !BRIGHTNESS_RANGE.contains(&brightness) {
        debug!("screen: brightness {brightness} out of range, skipped");
        return ReconcileOutcome::Skipped;
    }

    let screen = &live.screen;
    let mut issues = Issues::new("screen");

    let live_screensaver = screen.screensaver_idle_time() > 0;
    let live_hide_cursor = screen.hide_cursor();
    let live_top_bar = screen.top_bar_position();
    let live_rotate = screen.rotate_screen();
    let live_gesture_type = screen.gesture_type();

    let screensaver = imported.get_screensaver_enable();
    let idle_seconds = if screensaver {
        imported.get_blank_after().saturating_mul(60)
    } else {
        0
    };
    let hide_cursor = imported.get_hide_cursor_enable();
    let top_bar = imported.get_top_bar_position();
    let rotate = imported.get_rotate_screen();

    issues.check("brightness", screen.set_brightness(brightness));
    issues.check("screensaver", screen.set_screensaver_idle_time(idle_seconds));
    issues.check("hide cursor", screen.set_hide_cursor(hide_cursor));

    if !imported.get_gesture_enable_string().is_empty()
        && (live_gesture_type.is_empty() || live_gesture_type == GESTURE_TYPE_GENERAL)
    {
        issues.check(
            "gesture",
            screen.set_all_finger_gesture_enabled(imported.get_gesture_enable()),
        );
        issues.check(
            "swipe down",
            screen.set_swipe_down_enabled(imported.get_gesture_swipe_down_enable()),
        );
        issues.check(
            "swipe up",
            screen.set_swipe_up_enabled(imported.get_gesture_swipe_up_enable()),
        );
        issues.check(
            "swipe right",
            screen.set_swipe_right_enabled(imported.get_gesture_swipe_right_enable()),
        );
    }
    if !top_bar.is_empty() {
        issues.check("top bar", screen.set_top_bar_position(&top_bar));
    }
    if !rotate.is_empty() {
        issues.check("rotation", screen.set_rotate_screen(&rotate));
    }
    issues.check("gesture service", screen.restart_gesture_service());

    let needs_reboot = live_screensaver != screensaver
        || live_hide_cursor != hide_cursor
        || live_top_bar != top_bar
        || live_rotate != rotate;
    debug!("screen: applied, reboot needed: {needs_reboot}");
    issues.finish(needs_reboot)
}

/// Timezone, NTP and the manual clock
pub fn reconcile_time(imported: &ConfigSchema, live: &LiveSystem) -> ReconcileOutcome {
    let timezone = imported.get_timezone();
    if timezone.is_empty() {
        debug!("time: no timezone, skipped");
        return ReconcileOutcome::Skipped;
    }

    let mut issues = Issues::new("time");
    let ntp = imported.get_ntp_enable();

    issues.check("timezone", live.time.set_timezone(&timezone));
    issues.check("ntp", live.time.set_ntp(ntp, &imported.get_ntp_server()));
    if !ntp {
        issues.check(
            "manual time",
            live.time.set_manual_date_time(&imported.get_manual_datetime()),
        );
    }
    issues.finish(false)
}

/// Interface addressing and the firewall
///
/// Interfaces that do not come online within the configured wait get an
/// offline provisioning file instead, and are marked unconfigured in the
/// imported file.
pub fn reconcile_network(
    imported: &ConfigSchema,
    live: &LiveSystem,
    config: &DeviceConfig,
) -> ReconcileOutcome {
    let mut issues = Issues::new("network");

    for iface in &config.interfaces {
        let settings = imported.get_net_settings(iface);
        if !settings.has_configured || settings.method.is_empty() {
            debug!("network: {iface} not configured, skipped");
            continue;
        }

        let online = wait_until(
            config.network_wait_timeout,
            config.network_poll_interval,
            || live.network.is_online(iface),
        );

        if online {
            apply_online(iface, &settings, live, &mut issues);
        } else {
            info!("network: {iface} offline, writing provisioning file");
            issues.check(
                &format!("{iface} has_configured"),
                imported.set_net_has_configured(iface, false),
            );
            issues.check(
                &format!("{iface} provisioning"),
                provision_offline(iface, &settings, live, config),
            );
        }
    }

    let rules = imported.get_firewall_rules();
    issues.check("firewall", live.network.set_firewall_accept_ports(&rules));
    issues.finish(false)
}

fn apply_online(iface: &str, settings: &NetSettings, live: &LiveSystem, issues: &mut Issues) {
    let network = &live.network;
    if settings.is_manual() {
        issues.check(
            &format!("{iface} static ip"),
            network.set_static_ip(
                iface,
                &settings.ip_address,
                None,
                &settings.subnet_mask,
                &settings.gateway,
            ),
        );
        issues.check(
            &format!("{iface} dns"),
            network.set_dns_servers(iface, &settings.dns1, &settings.dns2),
        );
    } else if settings.is_dhcp() {
        issues.check(&format!("{iface} dns"), network.set_dns_servers(iface, "", ""));
        issues.check(&format!("{iface} dhcp"), network.set_dhcp(iface));
    } else {
        warn!("network: {iface} has unknown method '{}'", settings.method);
    }
}

fn provision_offline(
    iface: &str,
    settings: &NetSettings,
    live: &LiveSystem,
    config: &DeviceConfig,
) -> Result<()> {
    let mac = live.network.mac_address(iface).unwrap_or_else(|e| {
        warn!("network: no mac for {iface}: {e}");
        String::new()
    });
    let file = ProvisioningFile::stage(config, iface, &mac)?;
    let filled = if settings.is_manual() {
        file
            .set_static_ipv4(&settings.ip_address, &settings.subnet_mask, &settings.gateway)
            .and_then(|()| file.set_nameservers(&settings.dns1, &settings.dns2))
    } else if settings.is_dhcp() {
        file.set_dhcp()
    } else {
        Ok(())
    };

    if let Err(e) = filled {
        if let Err(discard) = file.discard() {
            warn!("network: {iface} staging file left behind: {discard}");
        }
        return Err(e);
    }
    file.install()?;
    Ok(())
}

/// COM ports, reboot schedule, USB, ethernet and desktop login
pub fn reconcile_system(imported: &ConfigSchema, live: &LiveSystem) -> ReconcileOutcome {
    if imported.get_com1_mode().is_empty() {
        debug!("system: no com1 mode, skipped");
        return ReconcileOutcome::Skipped;
    }

    let system = &live.system;
    let mut issues = Issues::new("system");
    let live_login = system.user_login_desktop();
    let login = imported.get_system_user_login_desktop();
    let schedule = imported.get_reboot_schedule();

    issues.check("com ports", system.init_com_ports());
    issues.check("reboot schedule", system.set_reboot_schedule(&schedule));
    if !imported.get_usb_enable_string().is_empty() {
        issues.check("usb", system.set_usb_enable(imported.get_usb_enable()));
    }
    if !imported.get_ethernet_enable_string().is_empty() {
        issues.check("ethernet", system.init_ethernet());
    }
    if !imported.get_system_user_login_desktop_string().is_empty()
        && !system.custom_user_login_desktop()
    {
        issues.check("desktop login", system.set_user_login_desktop(login));
    }

    issues.finish(live_login != login || schedule.enabled)
}

/// All four domains in order: screen, time, network, system
pub fn reconcile_all(
    imported: &ConfigSchema,
    live: &LiveSystem,
    config: &DeviceConfig,
) -> Vec<ReconcileOutcome> {
    vec![
        reconcile_screen(imported, live),
        reconcile_time(imported, live),
        reconcile_network(imported, live, config),
        reconcile_system(imported, live),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::memory::{MemoryScreen, MemorySystem, ScreenState, SystemState};
    use crate::live::{MemoryLive, MemoryNetwork};
    use crate::schema::FirewallRule;
    use crate::storage::{IniStorage, StorageBackend};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn config(root: &Path) -> DeviceConfig {
        DeviceConfig::builder("test")
            .provisioning_dir(root.join("connman"))
            .provisioning_staging_dir(root.join("userdata"))
            .interfaces(["eth0", "eth1"])
            .network_wait(Duration::from_millis(20), Duration::from_millis(5))
            .build()
    }

    fn imported(root: &Path) -> ConfigSchema {
        ConfigSchema::open(root.join("imported.ini")).unwrap()
    }

    #[test]
    fn test_screen_skipped_on_bad_brightness() {
        let dir = tempdir().unwrap();
        let schema = imported(dir.path());
        let fakes = MemoryLive::new();

        assert!(reconcile_screen(&schema, &fakes.live()).is_skipped());
        schema.set_brightness(101).unwrap();
        assert!(reconcile_screen(&schema, &fakes.live()).is_skipped());
        assert!(fakes.screen.calls().is_empty());
    }

    #[test]
    fn test_screen_applies_and_detects_reboot() {
        let dir = tempdir().unwrap();
        let schema = imported(dir.path());
        schema.set_brightness(70).unwrap();
        schema.set_screensaver_enable(true).unwrap();
        schema.set_blank_after(5).unwrap();
        schema.set_gesture_enable(true).unwrap();
        schema.set_gesture_swipe_up_enable(true).unwrap();

        let fakes = MemoryLive {
            screen: Arc::new(MemoryScreen::new(ScreenState {
                gesture_type: "general".into(),
                ..Default::default()
            })),
            ..MemoryLive::new()
        };

        let outcome = reconcile_screen(&schema, &fakes.live());
        assert_eq!(outcome, ReconcileOutcome::Applied { needs_reboot: true });

        let state = fakes.screen.state();
        assert_eq!(state.brightness, 70);
        assert_eq!(state.screensaver_idle_time, 300);
        assert!(state.all_finger_gesture);
        assert!(state.swipe_up);
        assert!(!state.swipe_down);
        assert!(fakes.screen.calls().iter().any(|c| c.starts_with("restart_gesture_service")));
    }

    #[test]
    fn test_screen_gestures_left_alone_for_custom_type() {
        let dir = tempdir().unwrap();
        let schema = imported(dir.path());
        schema.set_brightness(50).unwrap();
        schema.set_gesture_enable(true).unwrap();

        let fakes = MemoryLive {
            screen: Arc::new(MemoryScreen::new(ScreenState {
                gesture_type: "custom".into(),
                ..Default::default()
            })),
            ..MemoryLive::new()
        };

        let outcome = reconcile_screen(&schema, &fakes.live());
        assert_eq!(outcome, ReconcileOutcome::Applied { needs_reboot: false });
        assert!(!fakes.screen.state().all_finger_gesture);
    }

    #[test]
    fn test_screen_failure_is_partial() {
        let dir = tempdir().unwrap();
        let schema = imported(dir.path());
        schema.set_brightness(50).unwrap();

        let fakes = MemoryLive::new();
        fakes.screen.fail("set_brightness");

        let outcome = reconcile_screen(&schema, &fakes.live());
        assert_eq!(outcome.issues(), ["screen: brightness".to_string()]);
        // later calls still ran
        assert!(fakes.screen.calls().iter().any(|c| c.starts_with("restart_gesture_service")));
    }

    #[test]
    fn test_time_manual_clock_only_without_ntp() {
        let dir = tempdir().unwrap();
        let schema = imported(dir.path());
        let fakes = MemoryLive::new();
        assert!(reconcile_time(&schema, &fakes.live()).is_skipped());

        schema.set_timezone("Asia/Taipei").unwrap();
        schema.set_ntp_enable(false).unwrap();
        schema.set_date("2024-03-01").unwrap();
        schema.set_hour(9).unwrap();
        schema.set_minute(5).unwrap();
        schema.set_second(0).unwrap();

        let outcome = reconcile_time(&schema, &fakes.live());
        assert_eq!(outcome, ReconcileOutcome::Applied { needs_reboot: false });
        let state = fakes.time.state();
        assert_eq!(state.timezone, "Asia/Taipei");
        assert!(!state.ntp_enabled);
        assert_eq!(state.manual_datetime.as_deref(), Some("2024-03-01 9:5:0"));
    }

    #[test]
    fn test_network_online_static_and_dhcp() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let schema = imported(dir.path());
        schema.set_net_has_configured("eth0", true).unwrap();
        schema
            .set_net_static_ip("eth0", "10.0.0.2", "", "255.255.255.0", "10.0.0.1")
            .unwrap();
        schema.set_net_dns_server("eth0", "8.8.8.8", "1.1.1.1").unwrap();
        schema.set_net_has_configured("eth1", true).unwrap();
        schema.set_net_dhcp("eth1").unwrap();
        schema
            .set_firewall_rules(&[FirewallRule::new("tcp", "22", true)])
            .unwrap();

        let fakes = MemoryLive {
            network: Arc::new(MemoryNetwork::with_online(["eth0", "eth1"])),
            ..MemoryLive::new()
        };

        let outcome = reconcile_network(&schema, &fakes.live(), &config);
        assert_eq!(outcome, ReconcileOutcome::Applied { needs_reboot: false });

        let eth0 = fakes.network.interface("eth0");
        assert_eq!(eth0.method, "manual");
        assert_eq!(eth0.ipv4, "10.0.0.2");
        assert_eq!(eth0.dns, ("8.8.8.8".to_string(), "1.1.1.1".to_string()));
        assert_eq!(fakes.network.interface("eth1").method, "dhcp");
        assert_eq!(fakes.network.firewall(), vec![FirewallRule::new("tcp", "22", true)]);
    }

    #[test]
    fn test_network_offline_writes_provisioning() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let schema = imported(dir.path());
        schema.set_net_has_configured("eth1", true).unwrap();
        schema
            .set_net_static_ip("eth1", "192.168.1.9", "", "255.255.255.0", "192.168.1.1")
            .unwrap();
        schema.set_net_dns_server("eth1", "9.9.9.9", "").unwrap();

        let fakes = MemoryLive::new();
        fakes.network.set_mac("eth1", "aa:bb:cc:dd:ee:ff");

        let outcome = reconcile_network(&schema, &fakes.live(), &config);
        assert_eq!(outcome, ReconcileOutcome::Applied { needs_reboot: false });
        assert!(!schema.get_net_has_configured("eth1"));

        let doc = IniStorage::new()
            .read(&config.provisioning_path("eth1"))
            .unwrap();
        assert_eq!(doc.get("service_eth1", "MAC"), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(
            doc.get("service_eth1", "IPv4"),
            Some("192.168.1.9/255.255.255.0/192.168.1.1")
        );
        assert_eq!(doc.get("service_eth1", "Nameservers"), Some("9.9.9.9,"));
        assert!(!config.provisioning_path("eth0").exists());
    }

    #[test]
    fn test_network_offline_failure_discards_staging() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let schema = imported(dir.path());
        schema.set_net_has_configured("eth1", true).unwrap();
        schema
            .set_net_static_ip("eth1", "192.168.1.9", "", "255.255.255.0", "192.168.1.1")
            .unwrap();

        let fakes = MemoryLive::new();
        let outcome = reconcile_network(&schema, &fakes.live(), &config);

        assert!(matches!(outcome, ReconcileOutcome::Partial { .. }));
        assert!(outcome.issues().iter().any(|i| i.contains("eth1 provisioning")));
        assert!(!config.provisioning_staging_path("eth1").exists());
        assert!(!config.provisioning_path("eth1").exists());
    }

    #[test]
    fn test_system_reboot_rules() {
        let dir = tempdir().unwrap();
        let schema = imported(dir.path());
        let fakes = MemoryLive {
            system: Arc::new(MemorySystem::new(SystemState {
                custom_user_login_desktop: true,
                ..Default::default()
            })),
            ..MemoryLive::new()
        };
        assert!(reconcile_system(&schema, &fakes.live()).is_skipped());

        schema.set_com1_mode("RS232").unwrap();
        schema.set_system_user_login_desktop(true).unwrap();
        schema.set_usb_enable(false).unwrap();

        let outcome = reconcile_system(&schema, &fakes.live());
        // login differs from live even though a custom login blocks the change
        assert_eq!(outcome, ReconcileOutcome::Applied { needs_reboot: true });

        let state = fakes.system.state();
        assert!(!state.user_login_desktop);
        assert_eq!(state.usb_enabled, Some(false));
        assert!(state.reboot_schedule.is_some());
        assert!(!fakes.system.calls().iter().any(|c| c.starts_with("init_ethernet")));
    }
}
