//! Control file locations.
//!
//! Defaults match the stock kernel layout. Every path can be overridden from
//! the `[paths]` table of the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::led::{Channel, PhysicalLed};

const LEDS: &str = "/sys/class/leds";

fn led(name: &str, attr: &str) -> PathBuf {
    PathBuf::from(format!("{LEDS}/{name}/{attr}"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightPaths {
    pub red: PathBuf,
    pub green: PathBuf,
    pub blue: PathBuf,
    pub red_1: PathBuf,
    pub green_1: PathBuf,
    pub blue_1: PathBuf,
    pub red_2: PathBuf,
    pub green_2: PathBuf,
    pub blue_2: PathBuf,

    pub red_blink: PathBuf,
    pub green_blink: PathBuf,
    pub blue_blink: PathBuf,

    /// Preferred backlight file, used whenever it exists.
    pub lcd_backlight: PathBuf,
    /// Backlight file used when `lcd_backlight` is absent.
    pub panel_backlight: PathBuf,
    /// Low-persistence display mode toggle.
    pub persistence: PathBuf,

    pub button_backlight: PathBuf,

    /// Keyboard virtual LEDs; both receive the same packed value.
    pub vled0: PathBuf,
    pub vled1: PathBuf,
    /// Single-bit keyboard LED on boards without RGB.
    pub aled: PathBuf,
}

impl Default for LightPaths {
    fn default() -> Self {
        LightPaths {
            red: led("red", "brightness"),
            green: led("green", "brightness"),
            blue: led("blue", "brightness"),
            red_1: led("red-1", "brightness"),
            green_1: led("green-1", "brightness"),
            blue_1: led("blue-1", "brightness"),
            red_2: led("red-2", "brightness"),
            green_2: led("green-2", "brightness"),
            blue_2: led("blue-2", "brightness"),
            red_blink: led("red", "blink"),
            green_blink: led("green", "blink"),
            blue_blink: led("blue", "blink"),
            lcd_backlight: led("lcd-backlight", "brightness"),
            panel_backlight: PathBuf::from("/sys/class/backlight/panel0-backlight/brightness"),
            persistence: PathBuf::from("/sys/class/graphics/fb0/msm_fb_persist_mode"),
            button_backlight: led("button-backlight", "brightness"),
            vled0: led("vled0", "brightness"),
            vled1: led("vled1", "brightness"),
            aled: led("aled", "brightness"),
        }
    }
}

impl LightPaths {
    /// Brightness file of a physical endpoint.
    pub fn brightness(&self, led: PhysicalLed) -> &Path {
        match led {
            PhysicalLed::Red0 => &self.red,
            PhysicalLed::Green0 => &self.green,
            PhysicalLed::Blue0 => &self.blue,
            PhysicalLed::Red1 => &self.red_1,
            PhysicalLed::Green1 => &self.green_1,
            PhysicalLed::Blue1 => &self.blue_1,
            PhysicalLed::Red2 => &self.red_2,
            PhysicalLed::Green2 => &self.green_2,
            PhysicalLed::Blue2 => &self.blue_2,
        }
    }

    /// Blink file of a channel's primary LED.
    pub fn blink(&self, channel: Channel) -> &Path {
        match channel {
            Channel::Red => &self.red_blink,
            Channel::Green => &self.green_blink,
            Channel::Blue => &self.blue_blink,
        }
    }

    /// Every path with its config key, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, &Path)> {
        vec![
            ("red", &self.red),
            ("green", &self.green),
            ("blue", &self.blue),
            ("red_1", &self.red_1),
            ("green_1", &self.green_1),
            ("blue_1", &self.blue_1),
            ("red_2", &self.red_2),
            ("green_2", &self.green_2),
            ("blue_2", &self.blue_2),
            ("red_blink", &self.red_blink),
            ("green_blink", &self.green_blink),
            ("blue_blink", &self.blue_blink),
            ("lcd_backlight", &self.lcd_backlight),
            ("panel_backlight", &self.panel_backlight),
            ("persistence", &self.persistence),
            ("button_backlight", &self.button_backlight),
            ("vled0", &self.vled0),
            ("vled1", &self.vled1),
            ("aled", &self.aled),
        ]
    }
}
