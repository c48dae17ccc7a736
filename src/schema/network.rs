//! Per-interface network sections (`[eth0]`, `[eth1]`, ...)

use super::ConfigSchema;
use super::keys::*;
use crate::error::{Error, Result};

/// Snapshot of one interface's stored settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetSettings {
    pub has_configured: bool,
    pub method: String,
    pub ip_address: String,
    pub subnet_mask: String,
    pub gateway: String,
    pub dns1: String,
    pub dns2: String,
}

impl NetSettings {
    pub fn is_manual(&self) -> bool {
        self.method == MODE_MANUAL
    }

    pub fn is_dhcp(&self) -> bool {
        self.method == MODE_DHCP
    }
}

impl ConfigSchema {
    pub fn get_net_has_configured(&self, iface: &str) -> bool {
        self.flag(iface, KEY_HAS_CONFIGURED)
    }

    pub fn set_net_has_configured(&self, iface: &str, configured: bool) -> Result<()> {
        self.set_flag(iface, KEY_HAS_CONFIGURED, configured)
    }

    /// `"dhcp"`, `"manual"` or empty when never configured
    pub fn get_net_method(&self, iface: &str) -> String {
        self.string(iface, KEY_IPV4_METHOD)
    }

    pub fn get_net_ip_address(&self, iface: &str) -> String {
        self.string(iface, KEY_IPV4_ADDRESS)
    }

    pub fn get_net_ipv6_address(&self, iface: &str) -> String {
        self.string(iface, KEY_IPV6_ADDRESS)
    }

    pub fn get_net_gateway(&self, iface: &str) -> String {
        self.string(iface, KEY_IPV4_GATEWAY)
    }

    pub fn get_net_subnet_mask(&self, iface: &str) -> String {
        self.string(iface, KEY_IPV4_MASK)
    }

    /// Nameservers in stored order, empty entries dropped
    pub fn get_net_dns_servers(&self, iface: &str) -> Vec<String> {
        self.string(iface, KEY_NAMESERVERS)
            .split(NAMESERVER_SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Switch the interface to DHCP; static values are left in place
    pub fn set_net_dhcp(&self, iface: &str) -> Result<()> {
        self.set_string(iface, KEY_IPV4_METHOD, MODE_DHCP)
    }

    /// Switch the interface to a static address
    ///
    /// The IPv6 address is only written when non-empty.
    ///
    /// # Errors
    ///
    /// `MissingParameter` when both addresses are empty.
    pub fn set_net_static_ip(
        &self,
        iface: &str,
        ipv4: &str,
        ipv6: &str,
        subnet_mask: &str,
        gateway: &str,
    ) -> Result<()> {
        if ipv4.is_empty() && ipv6.is_empty() {
            log::warn!("[{iface}] static ip without any address");
            return Err(Error::MissingParameter("ip address".into()));
        }

        let mut entries = vec![
            (KEY_IPV4_METHOD, MODE_MANUAL),
            (KEY_IPV4_ADDRESS, ipv4),
            (KEY_IPV4_GATEWAY, gateway),
            (KEY_IPV4_MASK, subnet_mask),
        ];
        if !ipv6.is_empty() {
            entries.push((KEY_IPV6_ADDRESS, ipv6));
        }
        self.store().set_many(iface, &entries)
    }

    /// Store nameservers, each followed by `;`; empty entries are skipped
    pub fn set_net_dns_server(&self, iface: &str, dns1: &str, dns2: &str) -> Result<()> {
        let joined: String = [dns1, dns2]
            .into_iter()
            .filter(|d| !d.is_empty())
            .map(|d| format!("{d}{NAMESERVER_SEPARATOR}"))
            .collect();
        self.set_string(iface, KEY_NAMESERVERS, &joined)
    }

    pub fn get_net_settings(&self, iface: &str) -> NetSettings {
        let mut dns = self.get_net_dns_servers(iface).into_iter();
        NetSettings {
            has_configured: self.get_net_has_configured(iface),
            method: self.get_net_method(iface),
            ip_address: self.get_net_ip_address(iface),
            subnet_mask: self.get_net_subnet_mask(iface),
            gateway: self.get_net_gateway(iface),
            dns1: dns.next().unwrap_or_default(),
            dns2: dns.next().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn schema() -> (tempfile::TempDir, ConfigSchema) {
        let dir = tempdir().unwrap();
        let schema = ConfigSchema::open(dir.path().join("settings_config.ini")).unwrap();
        (dir, schema)
    }

    #[test]
    fn test_dhcp_then_static() {
        let (_dir, schema) = schema();
        schema.set_net_dhcp("eth0").unwrap();
        assert_eq!(schema.get_net_method("eth0"), "dhcp");

        schema
            .set_net_static_ip("eth0", "192.168.1.5", "", "255.255.255.0", "192.168.1.1")
            .unwrap();
        assert_eq!(schema.get_net_method("eth0"), "manual");
        assert_eq!(schema.get_net_ip_address("eth0"), "192.168.1.5");
        assert_eq!(schema.get_net_subnet_mask("eth0"), "255.255.255.0");
        assert_eq!(schema.get_net_gateway("eth0"), "192.168.1.1");
        assert_eq!(schema.store().get("eth0", KEY_IPV6_ADDRESS).unwrap(), None);
    }

    #[test]
    fn test_dns_join_and_split() {
        let (_dir, schema) = schema();
        schema.set_net_dns_server("eth1", "8.8.8.8", "1.1.1.1").unwrap();
        assert_eq!(
            schema.store().get("eth1", KEY_NAMESERVERS).unwrap().as_deref(),
            Some("8.8.8.8;1.1.1.1;")
        );
        assert_eq!(schema.get_net_dns_servers("eth1"), vec!["8.8.8.8", "1.1.1.1"]);

        schema.set_net_dns_server("eth1", "", "9.9.9.9").unwrap();
        let net = schema.get_net_settings("eth1");
        assert_eq!(net.dns1, "9.9.9.9");
        assert_eq!(net.dns2, "");
    }

    #[test]
    fn test_missing_parameters() {
        let (_dir, schema) = schema();
        assert!(matches!(
            schema.set_net_static_ip("eth0", "", "", "255.0.0.0", "10.0.0.1"),
            Err(Error::MissingParameter(_))
        ));
        assert!(matches!(schema.set_net_dhcp(""), Err(Error::MissingParameter(_))));
        assert!(!schema.get_net_has_configured("eth0"));
    }
}
