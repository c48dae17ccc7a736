//! Security, VNC and FTP settings; the three passwords are secret fields

use super::ConfigSchema;
use super::keys::*;
use crate::credentials::{FTP_PASSWORD, LOGIN_PASSWORD, VNC_PASSWORD};
use crate::error::Result;

impl ConfigSchema {
    // security

    pub fn get_login_enable(&self) -> bool {
        self.flag(SECTION_SECURITY, KEY_LOGIN_ENABLE)
    }

    pub fn set_login_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SECURITY, KEY_LOGIN_ENABLE, enabled)
    }

    pub fn get_login_password(&self) -> String {
        self.read_secret(LOGIN_PASSWORD)
    }

    pub fn set_login_password(&self, password: &str) -> Result<()> {
        self.write_secret(LOGIN_PASSWORD, password)
    }

    pub fn get_login_type(&self) -> String {
        self.string(SECTION_SECURITY, KEY_LOGIN_TYPE)
    }

    pub fn set_login_type(&self, login_type: &str) -> Result<()> {
        self.set_string(SECTION_SECURITY, KEY_LOGIN_TYPE, login_type)
    }

    /// Display alias for a system user, from `[login_<user>] alias_name`
    pub fn get_login_name_alias(&self, username: &str) -> String {
        if username.is_empty() {
            return String::new();
        }
        self.string(&format!("{PATTERN_LOGIN}{username}"), KEY_ALIAS_NAME)
    }

    pub fn set_login_name_alias(&self, username: &str, alias: &str) -> Result<()> {
        self.set_string(&format!("{PATTERN_LOGIN}{username}"), KEY_ALIAS_NAME, alias)
    }

    // vnc

    pub fn get_vnc_server_address(&self) -> String {
        self.string(SECTION_VNC, KEY_VNC_SERVER_ADDRESS)
    }

    pub fn set_vnc_server_address(&self, address: &str) -> Result<()> {
        self.set_string(SECTION_VNC, KEY_VNC_SERVER_ADDRESS, address)
    }

    pub fn get_vnc_server_port(&self) -> String {
        self.string(SECTION_VNC, KEY_VNC_SERVER_PORT)
    }

    pub fn set_vnc_server_port(&self, port: &str) -> Result<()> {
        self.set_string(SECTION_VNC, KEY_VNC_SERVER_PORT, port)
    }

    pub fn get_vnc_server_password(&self) -> String {
        self.read_secret(VNC_PASSWORD)
    }

    pub fn set_vnc_server_password(&self, password: &str) -> Result<()> {
        self.write_secret(VNC_PASSWORD, password)
    }

    pub fn get_vnc_server_viewonly(&self) -> bool {
        self.flag(SECTION_VNC, KEY_VNC_SERVER_VIEWONLY)
    }

    pub fn set_vnc_server_viewonly(&self, viewonly: bool) -> Result<()> {
        self.set_flag(SECTION_VNC, KEY_VNC_SERVER_VIEWONLY, viewonly)
    }

    pub fn get_vnc_server_image_quality(&self) -> i32 {
        self.int(SECTION_VNC, KEY_VNC_SERVER_IMAGE_QUALITY)
    }

    pub fn set_vnc_server_image_quality(&self, quality: i32) -> Result<()> {
        self.set_int(SECTION_VNC, KEY_VNC_SERVER_IMAGE_QUALITY, quality)
    }

    pub fn get_vnc_server_fullscreen(&self) -> bool {
        self.flag(SECTION_VNC, KEY_VNC_SERVER_FULLSCREEN)
    }

    pub fn set_vnc_server_fullscreen(&self, fullscreen: bool) -> Result<()> {
        self.set_flag(SECTION_VNC, KEY_VNC_SERVER_FULLSCREEN, fullscreen)
    }

    pub fn get_vnc_server_fit_window(&self) -> bool {
        self.flag(SECTION_VNC, KEY_VNC_SERVER_FIT_WINDOW)
    }

    pub fn set_vnc_server_fit_window(&self, fit: bool) -> Result<()> {
        self.set_flag(SECTION_VNC, KEY_VNC_SERVER_FIT_WINDOW, fit)
    }

    pub fn get_vnc_server_polling_period(&self) -> i32 {
        self.int(SECTION_VNC, KEY_VNC_SERVER_POLLING_PERIOD)
    }

    pub fn set_vnc_server_polling_period(&self, period: i32) -> Result<()> {
        self.set_int(SECTION_VNC, KEY_VNC_SERVER_POLLING_PERIOD, period)
    }

    // ftp

    pub fn get_ftp_server_address(&self) -> String {
        self.string(SECTION_FTP, KEY_FTP_SERVER_ADDRESS)
    }

    pub fn set_ftp_server_address(&self, address: &str) -> Result<()> {
        self.set_string(SECTION_FTP, KEY_FTP_SERVER_ADDRESS, address)
    }

    pub fn get_ftp_server_port(&self) -> String {
        self.string(SECTION_FTP, KEY_FTP_SERVER_PORT)
    }

    pub fn set_ftp_server_port(&self, port: &str) -> Result<()> {
        self.set_string(SECTION_FTP, KEY_FTP_SERVER_PORT, port)
    }

    pub fn get_ftp_server_username(&self) -> String {
        self.string(SECTION_FTP, KEY_FTP_SERVER_USERNAME)
    }

    pub fn set_ftp_server_username(&self, username: &str) -> Result<()> {
        self.set_string(SECTION_FTP, KEY_FTP_SERVER_USERNAME, username)
    }

    pub fn get_ftp_server_password(&self) -> String {
        self.read_secret(FTP_PASSWORD)
    }

    pub fn set_ftp_server_password(&self, password: &str) -> Result<()> {
        self.write_secret(FTP_PASSWORD, password)
    }

    pub fn get_ftp_server_remote_path(&self) -> String {
        self.string(SECTION_FTP, KEY_FTP_SERVER_REMOTE_PATH)
    }

    pub fn set_ftp_server_remote_path(&self, path: &str) -> Result<()> {
        self.set_string(SECTION_FTP, KEY_FTP_SERVER_REMOTE_PATH, path)
    }

    pub fn get_ftp_server_local_path(&self) -> String {
        self.string(SECTION_FTP, KEY_FTP_SERVER_LOCAL_PATH)
    }

    pub fn set_ftp_server_local_path(&self, path: &str) -> Result<()> {
        self.set_string(SECTION_FTP, KEY_FTP_SERVER_LOCAL_PATH, path)
    }
}
