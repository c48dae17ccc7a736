//! Section and key names of the settings file

// core
pub const SECTION_CORE: &str = "core";
pub const KEY_APP_MODE: &str = "app_mode";
pub const PATTERN_PAGE_INDEX: &str = "page_";

pub const APP_MODE_INIT: &str = "init";
pub const APP_MODE_GENERAL: &str = "general";

// ui
pub const SECTION_UI: &str = "ui";
pub const KEY_THEME: &str = "theme";
pub const KEY_KEYBOARD_LOCALE: &str = "keyboard_locale";

// credentials
pub const SECTION_CREDENTIALS: &str = "credentials";
pub const KEY_ROOT_PASSWORD_REQUIRED: &str = "root_password_required";
pub const KEY_WESTON_PASSWORD_REQUIRED: &str = "weston_password_required";

// wizard
pub const SECTION_WIZARD_NETWORK: &str = "wiznetwork";
pub const SECTION_WIZARD_TIME: &str = "wiztime";
pub const SECTION_WIZARD_SCREEN: &str = "wizscreen";
pub const SECTION_WIZARD_STARTUP: &str = "wizstartup";

// page visibility
pub const KEY_IS_SHOWED: &str = "is_showed";
pub const KEY_NEXT_PAGE: &str = "next_page";

// screen
pub const SECTION_SCREEN: &str = "screen";
pub const KEY_BRIGHTNESS: &str = "brightness";
pub const KEY_SCREENSAVER_ENABLE: &str = "screensaver_enable";
pub const KEY_BLANK_AFTER: &str = "blank_after_period";
pub const KEY_HIDE_CURSOR_ENABLE: &str = "hide_cursor_enable";
pub const KEY_TOP_BAR_POSITION: &str = "top_bar_position";
pub const KEY_ROTATE_SCREEN: &str = "rotate_screen";
pub const KEY_GESTURE_ENABLE: &str = "gesture_enable";
pub const KEY_GESTURE_SWIPE_DOWN_ENABLE: &str = "gesture_swipe_down_enable";
pub const KEY_GESTURE_SWIPE_UP_ENABLE: &str = "gesture_swipe_up_enable";
pub const KEY_GESTURE_SWIPE_RIGHT_ENABLE: &str = "gesture_swipe_right_enable";

// startup
pub const SECTION_STARTUP: &str = "startup";
pub const KEY_STARTUP_NAME: &str = "startup_name";
pub const KEY_STARTUP_COMMAND: &str = "startup_command";
pub const KEY_STARTUP_RESTART: &str = "startup_restart";
pub const KEY_STATIC_PAGE_TIMEOUT: &str = "static_page_timeout";
pub const KEY_STATIC_PAGE_URL: &str = "static_page_url";
pub const KEY_STATIC_PAGE_FILE_PATH: &str = "static_page_file_path";

// web pages
pub const SECTION_WEB_PAGES: &str = "web_pages";
pub const PATTERN_WEB_PAGE: &str = "web_page_";
pub const KEY_PAGE: &str = "page";
pub const KEY_IS_STARTUP: &str = "is_startup";
pub const KEY_COUNT: &str = "count";

// system
pub const SECTION_SYSTEM: &str = "system";
pub const KEY_COM1_MODE: &str = "com1_mode";
pub const KEY_COM2_MODE: &str = "com2_mode";
pub const KEY_COM1_BAUDRATE: &str = "com1_baudrate";
pub const KEY_COM2_BAUDRATE: &str = "com2_baudrate";
pub const KEY_USER_LOGIN_DESKTOP: &str = "user_login_desktop";
pub const KEY_RS_CRON_ENABLE: &str = "rs_cron_enable";
pub const KEY_RS_CRON_MODE: &str = "rs_cron_mode";
pub const KEY_RS_CRON_MINUTE: &str = "rs_cron_minute";
pub const KEY_RS_CRON_HOUR: &str = "rs_cron_hour";
pub const KEY_RS_CRON_DAYOFWEEK: &str = "rs_cron_dayofweek";
pub const KEY_ETHERNET_ENABLE: &str = "ethernet_enable";
pub const KEY_USB_ENABLE: &str = "usb_enable";
pub const KEY_CHROMIUM_USE_SYS_VKB: &str = "chromium_use_sys_vkb";
pub const KEY_CHROMIUM_USE_CUSTOM_VKB: &str = "chromium_use_custom_vkb";
pub const KEY_COM_IS_SHOWED_FOR_USER: &str = "com_is_showed_for_user";

// security
pub const SECTION_SECURITY: &str = "security";
pub const KEY_LOGIN_ENABLE: &str = "login_enable";
pub const KEY_LOGIN_TYPE: &str = "login_type";
pub const PATTERN_LOGIN: &str = "login_";
pub const KEY_ALIAS_NAME: &str = "alias_name";

// time
pub const SECTION_TIME: &str = "time";
pub const KEY_TIMEZONE: &str = "timezone";
pub const KEY_NTP_ENABLE: &str = "ntp_enable";
pub const KEY_NTP_SERVER: &str = "ntp_server";
pub const KEY_DATE: &str = "date";
pub const KEY_HOUR: &str = "hour";
pub const KEY_MINUTE: &str = "minute";
pub const KEY_SECOND: &str = "second";

// vnc
pub const SECTION_VNC: &str = "vnc";
pub const KEY_VNC_SERVER_ADDRESS: &str = "vnc_server_address";
pub const KEY_VNC_SERVER_PORT: &str = "vnc_server_port";
pub const KEY_VNC_SERVER_VIEWONLY: &str = "vnc_server_viewonly";
pub const KEY_VNC_SERVER_IMAGE_QUALITY: &str = "vnc_server_image_quality";
pub const KEY_VNC_SERVER_FULLSCREEN: &str = "vnc_server_fullscreen";
pub const KEY_VNC_SERVER_FIT_WINDOW: &str = "vnc_server_fit_window";
pub const KEY_VNC_SERVER_POLLING_PERIOD: &str = "vnc_server_polling_period";

// ftp
pub const SECTION_FTP: &str = "ftp";
pub const KEY_FTP_SERVER_ADDRESS: &str = "ftp_server_address";
pub const KEY_FTP_SERVER_PORT: &str = "ftp_server_port";
pub const KEY_FTP_SERVER_USERNAME: &str = "ftp_server_username";
pub const KEY_FTP_SERVER_REMOTE_PATH: &str = "ftp_server_remote_path";
pub const KEY_FTP_SERVER_LOCAL_PATH: &str = "ftp_server_local_path";

// network (per-interface section named after the interface)
pub const SECTION_NETWORK: &str = "network";
pub const KEY_HAS_CONFIGURED: &str = "has_configured";
pub const KEY_IPV4_METHOD: &str = "IPv4.method";
pub const KEY_IPV4_ADDRESS: &str = "IPv4.local_address";
pub const KEY_IPV4_GATEWAY: &str = "IPv4.gateway";
pub const KEY_IPV4_MASK: &str = "IPv4.mask";
pub const KEY_IPV6_ADDRESS: &str = "IPv6.local_address";
pub const KEY_NAMESERVERS: &str = "Nameservers";
pub const NAMESERVER_SEPARATOR: &str = ";";

pub const MODE_DHCP: &str = "dhcp";
pub const MODE_MANUAL: &str = "manual";

// firewall
pub const SECTION_FIREWALL_RULES: &str = "firewall_rules";
pub const PATTERN_FIREWALL_RULE: &str = "firewall_rule_";
pub const KEY_PROTOCOL: &str = "protocol";
pub const KEY_PORT: &str = "port";
pub const KEY_IS_ALLOWED: &str = "is_allowed";

// backup
pub const SECTION_BACKUP: &str = "backup";
pub const KEY_BACKUP_CONFIG_ENABLE: &str = "backup_config_enable";
pub const KEY_BACKUP_USER_ENABLE: &str = "backup_user_enable";

// plain pages
pub const SECTION_STORAGE: &str = "storage";
pub const SECTION_UPDATE: &str = "update";
pub const SECTION_LOGO: &str = "logo";
pub const SECTION_PASSWORD: &str = "password";
pub const SECTION_ABOUT: &str = "about";
pub const SECTION_EXIT: &str = "exit";

// operate
pub const SECTION_OPERATE: &str = "operate";
pub const KEY_EXPORT_SETTING_IS_SHOWED_FOR_USER: &str = "export_setting_is_showed_for_user";
pub const KEY_EXPORT_SCREENSHOT_IS_SHOWED_FOR_USER: &str = "export_screenshot_is_showed_for_user";
pub const KEY_IMPORT_SETTING_IS_SHOWED_FOR_USER: &str = "import_setting_is_showed_for_user";
pub const KEY_REBOOT_IS_SHOWED_FOR_USER: &str = "reboot_is_showed_for_user";
pub const KEY_SHUTDOWN_IS_SHOWED_FOR_USER: &str = "shutdown_is_showed_for_user";
pub const KEY_OPEN_TERMINAL_IS_SHOWED_FOR_USER: &str = "open_terminal_is_showed_for_user";
pub const KEY_FACTORY_RESET_IS_SHOWED_FOR_USER: &str = "factory_reset_is_showed_for_user";
