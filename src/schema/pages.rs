//! Page and function visibility
//!
//! Two defaulting rules coexist and both are kept as they are:
//! - a page with no `is_showed` key is hidden in init mode (the first-boot
//!   wizard only shows pages it was told to) and shown otherwise;
//! - a function flag with no value is always shown, so an administrator can
//!   never lose reboot/shutdown/factory-reset to a missing key.

use super::ConfigSchema;
use super::keys::*;
use crate::error::Result;
use crate::store::parse_bool;

/// Every page section with an `is_showed` / `next_page` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Credentials,
    WizardNetwork,
    WizardTime,
    WizardScreen,
    WizardStartup,
    Screen,
    System,
    Security,
    Time,
    Ftp,
    Network,
    Storage,
    Update,
    Logo,
    Password,
    Operate,
    About,
    Exit,
}

impl Page {
    pub const ALL: [Page; 18] = [
        Page::Credentials,
        Page::WizardNetwork,
        Page::WizardTime,
        Page::WizardScreen,
        Page::WizardStartup,
        Page::Screen,
        Page::System,
        Page::Security,
        Page::Time,
        Page::Ftp,
        Page::Network,
        Page::Storage,
        Page::Update,
        Page::Logo,
        Page::Password,
        Page::Operate,
        Page::About,
        Page::Exit,
    ];

    /// Config section holding this page's flags
    pub fn section(self) -> &'static str {
        match self {
            Page::Credentials => SECTION_CREDENTIALS,
            Page::WizardNetwork => SECTION_WIZARD_NETWORK,
            Page::WizardTime => SECTION_WIZARD_TIME,
            Page::WizardScreen => SECTION_WIZARD_SCREEN,
            Page::WizardStartup => SECTION_WIZARD_STARTUP,
            Page::Screen => SECTION_SCREEN,
            Page::System => SECTION_SYSTEM,
            Page::Security => SECTION_SECURITY,
            Page::Time => SECTION_TIME,
            Page::Ftp => SECTION_FTP,
            Page::Network => SECTION_NETWORK,
            Page::Storage => SECTION_STORAGE,
            Page::Update => SECTION_UPDATE,
            Page::Logo => SECTION_LOGO,
            Page::Password => SECTION_PASSWORD,
            Page::Operate => SECTION_OPERATE,
            Page::About => SECTION_ABOUT,
            Page::Exit => SECTION_EXIT,
        }
    }

    /// Look a page up by its section name
    pub fn from_name(name: &str) -> Option<Page> {
        Self::ALL.into_iter().find(|p| p.section() == name)
    }
}

macro_rules! page_getters {
    ($($name:ident => $page:expr),* $(,)?) => {
        $(
            pub fn $name(&self) -> bool {
                self.page_is_showed($page)
            }
        )*
    };
}

macro_rules! function_getters {
    ($($name:ident => ($section:expr, $key:expr)),* $(,)?) => {
        $(
            pub fn $name(&self) -> bool {
                self.get_function_is_showed_for_user($section, $key)
            }
        )*
    };
}

impl ConfigSchema {
    /// Page visibility for an arbitrary section
    ///
    /// A present value is read as a bool (so an empty value hides the page);
    /// an absent one falls back to the app-mode default.
    pub fn get_page_is_showed(&self, section: &str) -> bool {
        match self.value(section, KEY_IS_SHOWED) {
            Some(v) => parse_bool(&v),
            None => !self.is_init_mode(),
        }
    }

    pub fn page_is_showed(&self, page: Page) -> bool {
        self.get_page_is_showed(page.section())
    }

    pub fn get_page_is_showed_by_name(&self, name: &str) -> bool {
        self.get_page_is_showed(name)
    }

    pub fn set_page_is_showed(&self, section: &str, showed: bool) -> Result<()> {
        self.set_flag(section, KEY_IS_SHOWED, showed)
    }

    /// Function visibility: shown unless a non-empty value says otherwise
    pub fn get_function_is_showed_for_user(&self, section: &str, key: &str) -> bool {
        match self.value(section, key) {
            Some(v) if !v.trim().is_empty() => parse_bool(&v),
            _ => true,
        }
    }

    pub fn get_next_page_by_name(&self, name: &str) -> String {
        self.string(name, KEY_NEXT_PAGE)
    }

    pub fn set_next_page_by_name(&self, name: &str, next: &str) -> Result<()> {
        self.set_string(name, KEY_NEXT_PAGE, next)
    }

    /// Wizard step `index` from `[core] page_<index>`
    pub fn get_next_page_by_index(&self, index: usize) -> String {
        self.string(SECTION_CORE, &format!("{PATTERN_PAGE_INDEX}{index}"))
    }

    page_getters! {
        get_credentials_page_is_showed => Page::Credentials,
        get_wizard_network_page_is_showed => Page::WizardNetwork,
        get_wizard_time_page_is_showed => Page::WizardTime,
        get_wizard_screen_page_is_showed => Page::WizardScreen,
        get_wizard_startup_page_is_showed => Page::WizardStartup,
        get_screen_page_is_showed => Page::Screen,
        get_system_page_is_showed => Page::System,
        get_security_page_is_showed => Page::Security,
        get_time_page_is_showed => Page::Time,
        get_ftp_page_is_showed => Page::Ftp,
        get_network_page_is_showed => Page::Network,
        get_storage_page_is_showed => Page::Storage,
        get_update_page_is_showed => Page::Update,
        get_logo_page_is_showed => Page::Logo,
        get_password_page_is_showed => Page::Password,
        get_operate_page_is_showed => Page::Operate,
        get_about_page_is_showed => Page::About,
        get_exit_page_is_showed => Page::Exit,
    }

    function_getters! {
        get_export_setting_function_is_showed_for_user =>
            (SECTION_OPERATE, KEY_EXPORT_SETTING_IS_SHOWED_FOR_USER),
        get_export_screenshot_function_is_showed_for_user =>
            (SECTION_OPERATE, KEY_EXPORT_SCREENSHOT_IS_SHOWED_FOR_USER),
        get_import_setting_function_is_showed_for_user =>
            (SECTION_OPERATE, KEY_IMPORT_SETTING_IS_SHOWED_FOR_USER),
        get_reboot_function_is_showed_for_user =>
            (SECTION_OPERATE, KEY_REBOOT_IS_SHOWED_FOR_USER),
        get_shutdown_function_is_showed_for_user =>
            (SECTION_OPERATE, KEY_SHUTDOWN_IS_SHOWED_FOR_USER),
        get_open_terminal_function_is_showed_for_user =>
            (SECTION_OPERATE, KEY_OPEN_TERMINAL_IS_SHOWED_FOR_USER),
        get_factory_reset_function_is_showed_for_user =>
            (SECTION_OPERATE, KEY_FACTORY_RESET_IS_SHOWED_FOR_USER),
        get_com_function_is_showed_for_user =>
            (SECTION_SYSTEM, KEY_COM_IS_SHOWED_FOR_USER),
    }
}
