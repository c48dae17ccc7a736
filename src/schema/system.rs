use super::ConfigSchema;
use super::keys::*;
use crate::error::Result;

/// Scheduled-reboot crontab entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebootSchedule {
    pub enabled: bool,
    pub mode: String,
    pub minute: i32,
    pub hour: i32,
    pub day_of_week: i32,
}

impl ConfigSchema {
    pub fn get_com1_mode(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_COM1_MODE)
    }

    pub fn set_com1_mode(&self, mode: &str) -> Result<()> {
        self.set_string(SECTION_SYSTEM, KEY_COM1_MODE, mode)
    }

    pub fn get_com2_mode(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_COM2_MODE)
    }

    pub fn set_com2_mode(&self, mode: &str) -> Result<()> {
        self.set_string(SECTION_SYSTEM, KEY_COM2_MODE, mode)
    }

    pub fn get_com1_baudrate(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_COM1_BAUDRATE)
    }

    pub fn set_com1_baudrate(&self, baudrate: &str) -> Result<()> {
        self.set_string(SECTION_SYSTEM, KEY_COM1_BAUDRATE, baudrate)
    }

    pub fn get_com2_baudrate(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_COM2_BAUDRATE)
    }

    pub fn set_com2_baudrate(&self, baudrate: &str) -> Result<()> {
        self.set_string(SECTION_SYSTEM, KEY_COM2_BAUDRATE, baudrate)
    }

    pub fn get_system_user_login_desktop_string(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_USER_LOGIN_DESKTOP)
    }

    pub fn get_system_user_login_desktop(&self) -> bool {
        self.flag(SECTION_SYSTEM, KEY_USER_LOGIN_DESKTOP)
    }

    pub fn set_system_user_login_desktop(&self, user_login: bool) -> Result<()> {
        self.set_flag(SECTION_SYSTEM, KEY_USER_LOGIN_DESKTOP, user_login)
    }

    pub fn get_reboot_system_crontab_enabled(&self) -> bool {
        self.flag(SECTION_SYSTEM, KEY_RS_CRON_ENABLE)
    }

    pub fn set_reboot_system_crontab_enabled(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SYSTEM, KEY_RS_CRON_ENABLE, enabled)
    }

    pub fn get_reboot_system_crontab_mode(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_RS_CRON_MODE)
    }

    pub fn set_reboot_system_crontab_mode(&self, mode: &str) -> Result<()> {
        self.set_string(SECTION_SYSTEM, KEY_RS_CRON_MODE, mode)
    }

    pub fn get_reboot_system_crontab_minute(&self) -> i32 {
        self.int(SECTION_SYSTEM, KEY_RS_CRON_MINUTE)
    }

    pub fn set_reboot_system_crontab_minute(&self, minute: i32) -> Result<()> {
        self.set_int(SECTION_SYSTEM, KEY_RS_CRON_MINUTE, minute)
    }

    pub fn get_reboot_system_crontab_hour(&self) -> i32 {
        self.int(SECTION_SYSTEM, KEY_RS_CRON_HOUR)
    }

    pub fn set_reboot_system_crontab_hour(&self, hour: i32) -> Result<()> {
        self.set_int(SECTION_SYSTEM, KEY_RS_CRON_HOUR, hour)
    }

    pub fn get_reboot_system_crontab_dayofweek(&self) -> i32 {
        self.int(SECTION_SYSTEM, KEY_RS_CRON_DAYOFWEEK)
    }

    pub fn set_reboot_system_crontab_dayofweek(&self, day: i32) -> Result<()> {
        self.set_int(SECTION_SYSTEM, KEY_RS_CRON_DAYOFWEEK, day)
    }

    pub fn get_reboot_schedule(&self) -> RebootSchedule {
        RebootSchedule {
            enabled: self.get_reboot_system_crontab_enabled(),
            mode: self.get_reboot_system_crontab_mode(),
            minute: self.get_reboot_system_crontab_minute(),
            hour: self.get_reboot_system_crontab_hour(),
            day_of_week: self.get_reboot_system_crontab_dayofweek(),
        }
    }

    pub fn get_ethernet_enable_string(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_ETHERNET_ENABLE)
    }

    pub fn get_ethernet_enable(&self) -> bool {
        self.flag(SECTION_SYSTEM, KEY_ETHERNET_ENABLE)
    }

    pub fn set_ethernet_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SYSTEM, KEY_ETHERNET_ENABLE, enabled)
    }

    pub fn get_usb_enable_string(&self) -> String {
        self.string(SECTION_SYSTEM, KEY_USB_ENABLE)
    }

    pub fn get_usb_enable(&self) -> bool {
        self.flag(SECTION_SYSTEM, KEY_USB_ENABLE)
    }

    pub fn set_usb_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SYSTEM, KEY_USB_ENABLE, enabled)
    }

    pub fn get_chromium_use_sys_virtual_keyboard(&self) -> bool {
        self.flag(SECTION_SYSTEM, KEY_CHROMIUM_USE_SYS_VKB)
    }

    pub fn set_chromium_use_sys_virtual_keyboard(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SYSTEM, KEY_CHROMIUM_USE_SYS_VKB, enabled)
    }

    pub fn get_chromium_use_custom_virtual_keyboard(&self) -> bool {
        self.flag(SECTION_SYSTEM, KEY_CHROMIUM_USE_CUSTOM_VKB)
    }
}
