use super::ConfigSchema;
use super::keys::*;
use crate::error::Result;

impl ConfigSchema {
    pub fn get_brightness(&self) -> i32 {
        self.int(SECTION_SCREEN, KEY_BRIGHTNESS)
    }

    pub fn set_brightness(&self, brightness: i32) -> Result<()> {
        self.set_int(SECTION_SCREEN, KEY_BRIGHTNESS, brightness)
    }

    pub fn get_screensaver_enable(&self) -> bool {
        self.flag(SECTION_SCREEN, KEY_SCREENSAVER_ENABLE)
    }

    pub fn set_screensaver_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SCREEN, KEY_SCREENSAVER_ENABLE, enabled)
    }

    /// Minutes of idle time before the screen blanks
    pub fn get_blank_after(&self) -> i32 {
        self.int(SECTION_SCREEN, KEY_BLANK_AFTER)
    }

    pub fn set_blank_after(&self, minutes: i32) -> Result<()> {
        self.set_int(SECTION_SCREEN, KEY_BLANK_AFTER, minutes)
    }

    pub fn get_hide_cursor_enable(&self) -> bool {
        self.flag(SECTION_SCREEN, KEY_HIDE_CURSOR_ENABLE)
    }

    pub fn set_hide_cursor_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SCREEN, KEY_HIDE_CURSOR_ENABLE, enabled)
    }

    pub fn get_top_bar_position(&self) -> String {
        self.string(SECTION_SCREEN, KEY_TOP_BAR_POSITION)
    }

    pub fn set_top_bar_position(&self, position: &str) -> Result<()> {
        self.set_string(SECTION_SCREEN, KEY_TOP_BAR_POSITION, position)
    }

    pub fn get_rotate_screen(&self) -> String {
        self.string(SECTION_SCREEN, KEY_ROTATE_SCREEN)
    }

    pub fn set_rotate_screen(&self, rotation: &str) -> Result<()> {
        self.set_string(SECTION_SCREEN, KEY_ROTATE_SCREEN, rotation)
    }

    /// Raw gesture flag; empty means the export predates gestures
    pub fn get_gesture_enable_string(&self) -> String {
        self.string(SECTION_SCREEN, KEY_GESTURE_ENABLE)
    }

    pub fn get_gesture_enable(&self) -> bool {
        self.flag(SECTION_SCREEN, KEY_GESTURE_ENABLE)
    }

    pub fn set_gesture_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SCREEN, KEY_GESTURE_ENABLE, enabled)
    }

    pub fn get_gesture_swipe_down_enable(&self) -> bool {
        self.flag(SECTION_SCREEN, KEY_GESTURE_SWIPE_DOWN_ENABLE)
    }

    pub fn set_gesture_swipe_down_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SCREEN, KEY_GESTURE_SWIPE_DOWN_ENABLE, enabled)
    }

    pub fn get_gesture_swipe_up_enable(&self) -> bool {
        self.flag(SECTION_SCREEN, KEY_GESTURE_SWIPE_UP_ENABLE)
    }

    pub fn set_gesture_swipe_up_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SCREEN, KEY_GESTURE_SWIPE_UP_ENABLE, enabled)
    }

    pub fn get_gesture_swipe_right_enable(&self) -> bool {
        self.flag(SECTION_SCREEN, KEY_GESTURE_SWIPE_RIGHT_ENABLE)
    }

    pub fn set_gesture_swipe_right_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_SCREEN, KEY_GESTURE_SWIPE_RIGHT_ENABLE, enabled)
    }
}
