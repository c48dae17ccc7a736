use super::ConfigSchema;
use super::keys::*;
use crate::error::Result;

impl ConfigSchema {
    pub fn get_timezone(&self) -> String {
        self.string(SECTION_TIME, KEY_TIMEZONE)
    }

    pub fn set_timezone(&self, timezone: &str) -> Result<()> {
        self.set_string(SECTION_TIME, KEY_TIMEZONE, timezone)
    }

    pub fn get_ntp_enable(&self) -> bool {
        self.flag(SECTION_TIME, KEY_NTP_ENABLE)
    }

    pub fn set_ntp_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_TIME, KEY_NTP_ENABLE, enabled)
    }

    pub fn get_ntp_server(&self) -> String {
        self.string(SECTION_TIME, KEY_NTP_SERVER)
    }

    pub fn set_ntp_server(&self, server: &str) -> Result<()> {
        self.set_string(SECTION_TIME, KEY_NTP_SERVER, server)
    }

    pub fn get_date(&self) -> String {
        self.string(SECTION_TIME, KEY_DATE)
    }

    pub fn set_date(&self, date: &str) -> Result<()> {
        self.set_string(SECTION_TIME, KEY_DATE, date)
    }

    pub fn get_hour(&self) -> i32 {
        self.int(SECTION_TIME, KEY_HOUR)
    }

    pub fn set_hour(&self, hour: i32) -> Result<()> {
        self.set_int(SECTION_TIME, KEY_HOUR, hour)
    }

    pub fn get_minute(&self) -> i32 {
        self.int(SECTION_TIME, KEY_MINUTE)
    }

    pub fn set_minute(&self, minute: i32) -> Result<()> {
        self.set_int(SECTION_TIME, KEY_MINUTE, minute)
    }

    pub fn get_second(&self) -> i32 {
        self.int(SECTION_TIME, KEY_SECOND)
    }

    pub fn set_second(&self, second: i32) -> Result<()> {
        self.set_int(SECTION_TIME, KEY_SECOND, second)
    }

    /// Manual date-time as handed to the time daemon: `"{date} {h}:{m}:{s}"`
    pub fn get_manual_datetime(&self) -> String {
        format!(
            "{} {}:{}:{}",
            self.get_date(),
            self.get_hour(),
            self.get_minute(),
            self.get_second()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_manual_datetime_is_unpadded() {
        let dir = tempdir().unwrap();
        let schema = ConfigSchema::open(dir.path().join("settings_config.ini")).unwrap();
        schema.set_date("2024-03-01").unwrap();
        schema.set_hour(9).unwrap();
        schema.set_minute(5).unwrap();

        assert_eq!(schema.get_manual_datetime(), "2024-03-01 9:5:0");
    }
}
