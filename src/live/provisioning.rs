//! Offline provisioning files for interfaces that are down at restore time
//!
//! The network manager reads `<provisioning_dir>/<iface>_default.config`
//! whenever the interface next comes up. The file is assembled in a staging
//! location and moved into place in one step, so the network manager never
//! sees a half-written service block.

use crate::config::DeviceConfig;
use crate::error::{self, Error, Result};
use crate::schema::keys::MODE_DHCP;
use crate::store::ConfigStore;
use log::{debug, info};
use std::path::{Path, PathBuf};

const KEY_TYPE: &str = "Type";
const KEY_MAC: &str = "MAC";
const KEY_DEVICE_NAME: &str = "DeviceName";
const KEY_IPV4: &str = "IPv4";
const KEY_NAMESERVERS: &str = "Nameservers";
const TYPE_ETHERNET: &str = "ethernet";

/// A staged provisioning file for one interface
#[derive(Debug)]
pub struct ProvisioningFile {
    iface: String,
    section: String,
    staging: ConfigStore,
    target: PathBuf,
}

impl ProvisioningFile {
    /// Open the staging file for `iface`, writing its service header if new
    ///
    /// An empty `mac` leaves the `MAC` key out.
    ///
    /// # Errors
    ///
    /// `MissingParameter` for an empty interface name, otherwise store errors.
    pub fn stage(config: &DeviceConfig, iface: &str, mac: &str) -> Result<Self> {
        if iface.is_empty() {
            return Err(Error::MissingParameter("interface".into()));
        }
        let file = Self {
            iface: iface.to_string(),
            section: format!("service_{iface}"),
            staging: ConfigStore::open(config.provisioning_staging_path(iface)),
            target: config.provisioning_path(iface),
        };

        if !file.staging.exists() {
            debug!("{iface}: new provisioning staging file {}", file.staging.path().display());
            let mut header = vec![(KEY_TYPE, TYPE_ETHERNET)];
            if !mac.is_empty() {
                header.push((KEY_MAC, mac));
            }
            header.push((KEY_DEVICE_NAME, iface));
            file.staging.set_many(&file.section, &header)?;
        }
        Ok(file)
    }

    pub fn staging_path(&self) -> &Path {
        self.staging.path()
    }

    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// `IPv4 = <ip>/<mask>/<gateway>`
    pub fn set_static_ipv4(&self, ip: &str, subnet_mask: &str, gateway: &str) -> Result<()> {
        if ip.is_empty() {
            return Err(Error::MissingParameter("ip address".into()));
        }
        self.staging
            .set(&self.section, KEY_IPV4, &format!("{ip}/{subnet_mask}/{gateway}"))
    }

    pub fn set_dhcp(&self) -> Result<()> {
        self.staging.set(&self.section, KEY_IPV4, MODE_DHCP)
    }

    /// `Nameservers = <dns1>,<dns2>`; at least one must be non-empty
    pub fn set_nameservers(&self, dns1: &str, dns2: &str) -> Result<()> {
        if dns1.is_empty() && dns2.is_empty() {
            return Err(Error::MissingParameter("nameserver".into()));
        }
        self.staging
            .set(&self.section, KEY_NAMESERVERS, &format!("{dns1},{dns2}"))
    }

    /// Drop the staged file without installing it
    pub fn discard(self) -> Result<()> {
        if self.staging.exists() {
            error::remove_file(self.staging.path())?;
            debug!("{}: staged provisioning file discarded", self.iface);
        }
        Ok(())
    }

    /// Move the staged file to where the network manager picks it up
    pub fn install(self) -> Result<PathBuf> {
        error::create_parent_dir(&self.target)?;
        error::move_file(self.staging.path(), &self.target)?;
        info!("{}: offline provisioning file at {}", self.iface, self.target.display());
        Ok(self.target)
    }
}
