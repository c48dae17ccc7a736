//! Live-system collaborators
//!
//! Reconciliation reads current hardware/service state and applies imported
//! values through these traits. Production code wires them to the OS tools;
//! tests use the in-memory implementations from [`memory`].
//!
//! Setters return `Result<()>`. Reconcilers treat every error here as soft:
//! it is logged and reported, never propagated.

pub mod memory;
pub mod provisioning;

pub use memory::{MemoryLive, MemoryNetwork, MemoryScreen, MemorySystem, MemoryTime};
pub use provisioning::ProvisioningFile;

use crate::error::Result;
use crate::schema::{FirewallRule, RebootSchedule};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Display, cursor and gesture control
pub trait ScreenControl: Send + Sync {
    /// Current screensaver idle time in seconds; 0 when disabled
    fn screensaver_idle_time(&self) -> i32;
    fn hide_cursor(&self) -> bool;
    fn top_bar_position(&self) -> String;
    fn rotate_screen(&self) -> String;
    /// Active gesture profile; empty or `"general"` for the stock one
    fn gesture_type(&self) -> String;

    fn set_brightness(&self, brightness: i32) -> Result<()>;
    fn set_screensaver_idle_time(&self, seconds: i32) -> Result<()>;
    fn set_hide_cursor(&self, hide: bool) -> Result<()>;
    fn set_top_bar_position(&self, position: &str) -> Result<()>;
    fn set_rotate_screen(&self, rotation: &str) -> Result<()>;
    fn set_all_finger_gesture_enabled(&self, enabled: bool) -> Result<()>;
    fn set_swipe_down_enabled(&self, enabled: bool) -> Result<()>;
    fn set_swipe_up_enabled(&self, enabled: bool) -> Result<()>;
    fn set_swipe_right_enabled(&self, enabled: bool) -> Result<()>;
    fn restart_gesture_service(&self) -> Result<()>;
}

/// Timezone and clock control
pub trait TimeControl: Send + Sync {
    fn set_timezone(&self, timezone: &str) -> Result<()>;
    fn set_ntp(&self, enabled: bool, server: &str) -> Result<()>;
    /// `datetime` is `"{date} {h}:{m}:{s}"`
    fn set_manual_date_time(&self, datetime: &str) -> Result<()>;
}

/// Network manager control
pub trait NetworkControl: Send + Sync {
    /// Whether the interface currently has a usable link and service
    fn is_online(&self, iface: &str) -> bool;
    fn mac_address(&self, iface: &str) -> Result<String>;

    fn set_static_ip(
        &self,
        iface: &str,
        ipv4: &str,
        ipv6: Option<&str>,
        subnet_mask: &str,
        gateway: &str,
    ) -> Result<()>;
    fn set_dhcp(&self, iface: &str) -> Result<()>;
    /// Empty values clear the static nameservers
    fn set_dns_servers(&self, iface: &str, dns1: &str, dns2: &str) -> Result<()>;
    fn set_firewall_accept_ports(&self, rules: &[FirewallRule]) -> Result<()>;
}

/// OS-level system settings
pub trait SystemControl: Send + Sync {
    /// Whether the root filesystem overlay discards changes on reboot
    fn readonly_mode(&self) -> bool;
    fn user_login_desktop(&self) -> bool;
    /// Whether the desktop login was customised by hand
    fn custom_user_login_desktop(&self) -> bool;

    fn init_com_ports(&self) -> Result<()>;
    fn set_reboot_schedule(&self, schedule: &RebootSchedule) -> Result<()>;
    fn set_usb_enable(&self, enabled: bool) -> Result<()>;
    fn init_ethernet(&self) -> Result<()>;
    fn set_user_login_desktop(&self, enabled: bool) -> Result<()>;
}

/// The collaborators a restore runs against
#[derive(Clone)]
pub struct LiveSystem {
    pub screen: Arc<dyn ScreenControl>,
    pub time: Arc<dyn TimeControl>,
    pub network: Arc<dyn NetworkControl>,
    pub system: Arc<dyn SystemControl>,
}

impl std::fmt::Debug for LiveSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSystem").finish_non_exhaustive()
    }
}

impl LiveSystem {
    pub fn new(
        screen: Arc<dyn ScreenControl>,
        time: Arc<dyn TimeControl>,
        network: Arc<dyn NetworkControl>,
        system: Arc<dyn SystemControl>,
    ) -> Self {
        Self {
            screen,
            time,
            network,
            system,
        }
    }
}

/// Poll `probe` until it returns true or `timeout` elapses
///
/// The probe runs at least once. Returns the last probe result.
pub fn wait_until(timeout: Duration, interval: Duration, mut probe: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if probe() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(interval.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_wait_until_immediate() {
        let calls = Cell::new(0);
        let ok = wait_until(Duration::from_secs(5), Duration::from_secs(1), || {
            calls.set(calls.get() + 1);
            true
        });
        assert!(ok);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_wait_until_eventually() {
        let calls = Cell::new(0);
        let ok = wait_until(Duration::from_secs(2), Duration::from_millis(1), || {
            calls.set(calls.get() + 1);
            calls.get() >= 3
        });
        assert!(ok);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_wait_until_times_out() {
        let start = Instant::now();
        let ok = wait_until(Duration::from_millis(20), Duration::from_millis(5), || false);
        assert!(!ok);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
