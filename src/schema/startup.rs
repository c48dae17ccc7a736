//! Startup application selection

use super::ConfigSchema;
use super::keys::*;
use crate::error::Result;

/// Application launched at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StartupApp {
    Settings,
    Chromium,
    ChromiumKiosk,
    StaticPage,
    StaticPageCustom,
    VncViewer,
    #[default]
    None,
}

/// (variant, stored name, launch command)
const STARTUP_TABLE: [(StartupApp, &str, &str); 7] = [
    (StartupApp::Settings, "Settings", "/usr/bin/start_settings_keyshortcuts.sh"),
    (StartupApp::Chromium, "Chromium", "/usr/bin/start_chromium.sh"),
    (StartupApp::ChromiumKiosk, "Chromium_kiosk", "/usr/bin/start_kiosk_chromium.sh"),
    (StartupApp::StaticPage, "StaticPage", "/usr/bin/start_static_page.sh"),
    (
        StartupApp::StaticPageCustom,
        "StaticPage_custom",
        "/usr/bin/start_static_page.sh --custom",
    ),
    (StartupApp::VncViewer, "VNCViewer", "/usr/bin/start_vnc_viewer.sh"),
    (StartupApp::None, "None", ""),
];

impl StartupApp {
    fn entry(self) -> (StartupApp, &'static str, &'static str) {
        STARTUP_TABLE
            .into_iter()
            .find(|(app, _, _)| *app == self)
            .unwrap_or((StartupApp::None, "None", ""))
    }

    /// Name as stored in `[startup] startup_name`
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Command stored in `[startup] startup_command`
    pub fn command(self) -> &'static str {
        self.entry().2
    }

    /// Resolve a stored name; unknown names map to `None`
    pub fn from_name(name: &str) -> StartupApp {
        STARTUP_TABLE
            .into_iter()
            .find(|(_, n, _)| *n == name)
            .map_or(StartupApp::None, |(app, _, _)| app)
    }

    pub fn all() -> impl Iterator<Item = StartupApp> {
        STARTUP_TABLE.into_iter().map(|(app, _, _)| app)
    }
}

impl ConfigSchema {
    pub fn get_startup(&self) -> StartupApp {
        StartupApp::from_name(&self.string(SECTION_STARTUP, KEY_STARTUP_NAME))
    }

    /// Store both the name and the launch command of `app`
    pub fn set_startup(&self, app: StartupApp) -> Result<()> {
        self.store().set_many(
            SECTION_STARTUP,
            &[(KEY_STARTUP_NAME, app.name()), (KEY_STARTUP_COMMAND, app.command())],
        )
    }

    pub fn get_startup_command(&self) -> String {
        self.string(SECTION_STARTUP, KEY_STARTUP_COMMAND)
    }

    pub fn get_startup_auto_restart(&self) -> bool {
        self.flag(SECTION_STARTUP, KEY_STARTUP_RESTART)
    }

    pub fn set_startup_auto_restart(&self, restart: bool) -> Result<()> {
        self.set_flag(SECTION_STARTUP, KEY_STARTUP_RESTART, restart)
    }

    pub fn get_static_page_timeout(&self) -> i32 {
        self.int(SECTION_STARTUP, KEY_STATIC_PAGE_TIMEOUT)
    }

    pub fn set_static_page_timeout(&self, timeout: i32) -> Result<()> {
        self.set_int(SECTION_STARTUP, KEY_STATIC_PAGE_TIMEOUT, timeout)
    }

    pub fn get_static_page_url(&self) -> String {
        self.string(SECTION_STARTUP, KEY_STATIC_PAGE_URL)
    }

    pub fn set_static_page_url(&self, url: &str) -> Result<()> {
        self.set_string(SECTION_STARTUP, KEY_STATIC_PAGE_URL, url)
    }

    pub fn get_static_page_file_path(&self) -> String {
        self.string(SECTION_STARTUP, KEY_STATIC_PAGE_FILE_PATH)
    }

    pub fn set_static_page_file_path(&self, path: &str) -> Result<()> {
        self.set_string(SECTION_STARTUP, KEY_STATIC_PAGE_FILE_PATH, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_table_round_trips() {
        for app in StartupApp::all() {
            assert_eq!(StartupApp::from_name(app.name()), app);
        }
        assert_eq!(StartupApp::from_name("Firefox"), StartupApp::None);
        assert_eq!(StartupApp::None.command(), "");
    }

    #[test]
    fn test_set_startup_writes_name_and_command() {
        let dir = tempdir().unwrap();
        let schema = ConfigSchema::open(dir.path().join("settings_config.ini")).unwrap();

        schema.set_startup(StartupApp::StaticPageCustom).unwrap();
        assert_eq!(schema.get_startup(), StartupApp::StaticPageCustom);
        assert_eq!(
            schema.get_startup_command(),
            "/usr/bin/start_static_page.sh --custom"
        );

        schema.set_startup(StartupApp::None).unwrap();
        assert_eq!(schema.get_startup(), StartupApp::None);
        assert_eq!(schema.get_startup_command(), "");
    }
}
