//! In-memory live collaborators for testing
//!
//! Each fake keeps a plain state struct and a log of applied calls, in
//! order. Individual operations can be made to fail with [`fail`].
//!
//! [`fail`]: MemoryScreen::fail

use super::{LiveSystem, NetworkControl, ScreenControl, SystemControl, TimeControl};
use crate::error::{Error, Result};
use crate::schema::{FirewallRule, RebootSchedule};
use crate::sync::{MutexExt, RwLockExt};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

/// Call log plus injected failures, shared by every fake
#[derive(Debug, Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl Recorder {
    /// Log `op` and fail if it was marked failing
    fn call(&self, op: &str, args: String) -> Result<()> {
        if self.failing.lock_recovered().contains(op) {
            return Err(Error::Command {
                program: op.to_string(),
                reason: "injected failure".into(),
            });
        }
        let entry = if args.is_empty() {
            op.to_string()
        } else {
            format!("{op} {args}")
        };
        self.calls.lock_recovered().push(entry);
        Ok(())
    }

    fn fail(&self, op: &str) {
        self.failing.lock_recovered().insert(op.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock_recovered().clone()
    }
}

macro_rules! recorder_api {
    ($ty:ty) => {
        impl $ty {
            /// Make every later call of `op` fail without touching state
            pub fn fail(&self, op: &str) {
                self.recorder.fail(op);
            }

            /// Applied calls in order, as `"op args"`
            pub fn calls(&self) -> Vec<String> {
                self.recorder.calls()
            }
        }
    };
}

// =============================================================================
// Screen
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    pub brightness: i32,
    pub screensaver_idle_time: i32,
    pub hide_cursor: bool,
    pub top_bar_position: String,
    pub rotate_screen: String,
    pub gesture_type: String,
    pub all_finger_gesture: bool,
    pub swipe_down: bool,
    pub swipe_up: bool,
    pub swipe_right: bool,
}

#[derive(Debug, Default)]
pub struct MemoryScreen {
    state: RwLock<ScreenState>,
    recorder: Recorder,
}

recorder_api!(MemoryScreen);

impl MemoryScreen {
    pub fn new(state: ScreenState) -> Self {
        Self {
            state: RwLock::new(state),
            recorder: Recorder::default(),
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state.read_recovered().clone()
    }
}

impl ScreenControl for MemoryScreen {
    fn screensaver_idle_time(&self) -> i32 {
        self.state.read_recovered().screensaver_idle_time
    }

    fn hide_cursor(&self) -> bool {
        self.state.read_recovered().hide_cursor
    }

    fn top_bar_position(&self) -> String {
        self.state.read_recovered().top_bar_position.clone()
    }

    fn rotate_screen(&self) -> String {
        self.state.read_recovered().rotate_screen.clone()
    }

    fn gesture_type(&self) -> String {
        self.state.read_recovered().gesture_type.clone()
    }

    fn set_brightness(&self, brightness: i32) -> Result<()> {
        self.recorder.call("set_brightness", brightness.to_string())?;
        self.state.write_recovered().brightness = brightness;
        Ok(())
    }

    fn set_screensaver_idle_time(&self, seconds: i32) -> Result<()> {
        self.recorder.call("set_screensaver_idle_time", seconds.to_string())?;
        self.state.write_recovered().screensaver_idle_time = seconds;
        Ok(())
    }

    fn set_hide_cursor(&self, hide: bool) -> Result<()> {
        self.recorder.call("set_hide_cursor", hide.to_string())?;
        self.state.write_recovered().hide_cursor = hide;
        Ok(())
    }

    fn set_top_bar_position(&self, position: &str) -> Result<()> {
        self.recorder.call("set_top_bar_position", position.to_string())?;
        self.state.write_recovered().top_bar_position = position.to_string();
        Ok(())
    }

    fn set_rotate_screen(&self, rotation: &str) -> Result<()> {
        self.recorder.call("set_rotate_screen", rotation.to_string())?;
        self.state.write_recovered().rotate_screen = rotation.to_string();
        Ok(())
    }

    fn set_all_finger_gesture_enabled(&self, enabled: bool) -> Result<()> {
        self.recorder.call("set_all_finger_gesture_enabled", enabled.to_string())?;
        self.state.write_recovered().all_finger_gesture = enabled;
        Ok(())
    }

    fn set_swipe_down_enabled(&self, enabled: bool) -> Result<()> {
        self.recorder.call("set_swipe_down_enabled", enabled.to_string())?;
        self.state.write_recovered().swipe_down = enabled;
        Ok(())
    }

    fn set_swipe_up_enabled(&self, enabled: bool) -> Result<()> {
        self.recorder.call("set_swipe_up_enabled", enabled.to_string())?;
        self.state.write_recovered().swipe_up = enabled;
        Ok(())
    }

    fn set_swipe_right_enabled(&self, enabled: bool) -> Result<()> {
        self.recorder.call("set_swipe_right_enabled", enabled.to_string())?;
        self.state.write_recovered().swipe_right = enabled;
        Ok(())
    }

    fn restart_gesture_service(&self) -> Result<()> {
        self.recorder.call("restart_gesture_service", String::new())
    }
}

// =============================================================================
// Time
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeState {
    pub timezone: String,
    pub ntp_enabled: bool,
    pub ntp_server: String,
    pub manual_datetime: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryTime {
    state: RwLock<TimeState>,
    recorder: Recorder,
}

recorder_api!(MemoryTime);

impl MemoryTime {
    pub fn state(&self) -> TimeState {
        self.state.read_recovered().clone()
    }
}

impl TimeControl for MemoryTime {
    fn set_timezone(&self, timezone: &str) -> Result<()> {
        self.recorder.call("set_timezone", timezone.to_string())?;
        self.state.write_recovered().timezone = timezone.to_string();
        Ok(())
    }

    fn set_ntp(&self, enabled: bool, server: &str) -> Result<()> {
        self.recorder.call("set_ntp", format!("{enabled} {server}"))?;
        let mut state = self.state.write_recovered();
        state.ntp_enabled = enabled;
        state.ntp_server = server.to_string();
        Ok(())
    }

    fn set_manual_date_time(&self, datetime: &str) -> Result<()> {
        self.recorder.call("set_manual_date_time", datetime.to_string())?;
        self.state.write_recovered().manual_datetime = Some(datetime.to_string());
        Ok(())
    }
}

// =============================================================================
// Network
// =============================================================================

/// Live state of one interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceState {
    pub online: bool,
    pub mac: String,
    pub method: String,
    pub ipv4: String,
    pub subnet_mask: String,
    pub gateway: String,
    pub dns: (String, String),
}

#[derive(Debug, Default)]
pub struct MemoryNetwork {
    interfaces: RwLock<HashMap<String, InterfaceState>>,
    firewall: RwLock<Vec<FirewallRule>>,
    recorder: Recorder,
}

recorder_api!(MemoryNetwork);

impl MemoryNetwork {
    /// Network with the given interfaces online; every other one is offline
    pub fn with_online<I, S>(online: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let network = Self::default();
        for iface in online {
            network.set_online(&iface.into(), true);
        }
        network
    }

    pub fn set_online(&self, iface: &str, online: bool) {
        self.interfaces
            .write_recovered()
            .entry(iface.to_string())
            .or_default()
            .online = online;
    }

    pub fn set_mac(&self, iface: &str, mac: &str) {
        self.interfaces
            .write_recovered()
            .entry(iface.to_string())
            .or_default()
            .mac = mac.to_string();
    }

    pub fn interface(&self, iface: &str) -> InterfaceState {
        self.interfaces
            .read_recovered()
            .get(iface)
            .cloned()
            .unwrap_or_default()
    }

    pub fn firewall(&self) -> Vec<FirewallRule> {
        self.firewall.read_recovered().clone()
    }

    fn update(&self, iface: &str, f: impl FnOnce(&mut InterfaceState)) {
        f(self
            .interfaces
            .write_recovered()
            .entry(iface.to_string())
            .or_default());
    }
}

impl NetworkControl for MemoryNetwork {
    fn is_online(&self, iface: &str) -> bool {
        self.interface(iface).online
    }

    fn mac_address(&self, iface: &str) -> Result<String> {
        let mac = self.interface(iface).mac;
        if mac.is_empty() {
            return Err(Error::NotFound(format!("mac address of {iface}")));
        }
        Ok(mac)
    }

    fn set_static_ip(
        &self,
        iface: &str,
        ipv4: &str,
        ipv6: Option<&str>,
        subnet_mask: &str,
        gateway: &str,
    ) -> Result<()> {
        self.recorder.call(
            "set_static_ip",
            format!("{iface} {ipv4} {} {subnet_mask} {gateway}", ipv6.unwrap_or("-")),
        )?;
        self.update(iface, |s| {
            s.method = "manual".into();
            s.ipv4 = ipv4.to_string();
            s.subnet_mask = subnet_mask.to_string();
            s.gateway = gateway.to_string();
        });
        Ok(())
    }

    fn set_dhcp(&self, iface: &str) -> Result<()> {
        self.recorder.call("set_dhcp", iface.to_string())?;
        self.update(iface, |s| s.method = "dhcp".into());
        Ok(())
    }

    fn set_dns_servers(&self, iface: &str, dns1: &str, dns2: &str) -> Result<()> {
        self.recorder
            .call("set_dns_servers", format!("{iface} {dns1} {dns2}").trim_end().to_string())?;
        self.update(iface, |s| s.dns = (dns1.to_string(), dns2.to_string()));
        Ok(())
    }

    fn set_firewall_accept_ports(&self, rules: &[FirewallRule]) -> Result<()> {
        self.recorder
            .call("set_firewall_accept_ports", rules.len().to_string())?;
        *self.firewall.write_recovered() = rules.to_vec();
        Ok(())
    }
}

// =============================================================================
// System
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemState {
    pub readonly: bool,
    pub user_login_desktop: bool,
    pub custom_user_login_desktop: bool,
    pub usb_enabled: Option<bool>,
    pub reboot_schedule: Option<RebootSchedule>,
}

#[derive(Debug, Default)]
pub struct MemorySystem {
    state: RwLock<SystemState>,
    recorder: Recorder,
}

recorder_api!(MemorySystem);

impl MemorySystem {
    pub fn new(state: SystemState) -> Self {
        Self {
            state: RwLock::new(state),
            recorder: Recorder::default(),
        }
    }

    pub fn state(&self) -> SystemState {
        self.state.read_recovered().clone()
    }

    pub fn set_readonly(&self, readonly: bool) {
        self.state.write_recovered().readonly = readonly;
    }
}

impl SystemControl for MemorySystem {
    fn readonly_mode(&self) -> bool {
        self.state.read_recovered().readonly
    }

    fn user_login_desktop(&self) -> bool {
        self.state.read_recovered().user_login_desktop
    }

    fn custom_user_login_desktop(&self) -> bool {
        self.state.read_recovered().custom_user_login_desktop
    }

    fn init_com_ports(&self) -> Result<()> {
        self.recorder.call("init_com_ports", String::new())
    }

    fn set_reboot_schedule(&self, schedule: &RebootSchedule) -> Result<()> {
        self.recorder.call(
            "set_reboot_schedule",
            format!(
                "{} {} {} {} {}",
                schedule.enabled, schedule.mode, schedule.minute, schedule.hour, schedule.day_of_week
            ),
        )?;
        self.state.write_recovered().reboot_schedule = Some(schedule.clone());
        Ok(())
    }

    fn set_usb_enable(&self, enabled: bool) -> Result<()> {
        self.recorder.call("set_usb_enable", enabled.to_string())?;
        self.state.write_recovered().usb_enabled = Some(enabled);
        Ok(())
    }

    fn init_ethernet(&self) -> Result<()> {
        self.recorder.call("init_ethernet", String::new())
    }

    fn set_user_login_desktop(&self, enabled: bool) -> Result<()> {
        self.recorder.call("set_user_login_desktop", enabled.to_string())?;
        self.state.write_recovered().user_login_desktop = enabled;
        Ok(())
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// All four fakes, kept typed so tests can inspect them afterwards
#[derive(Debug, Clone, Default)]
pub struct MemoryLive {
    pub screen: Arc<MemoryScreen>,
    pub time: Arc<MemoryTime>,
    pub network: Arc<MemoryNetwork>,
    pub system: Arc<MemorySystem>,
}

impl MemoryLive {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same fakes behind the trait objects a restore expects
    pub fn live(&self) -> LiveSystem {
        LiveSystem::new(
            self.screen.clone(),
            self.time.clone(),
            self.network.clone(),
            self.system.clone(),
        )
    }
}
