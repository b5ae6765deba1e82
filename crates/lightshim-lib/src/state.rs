//! Light requests as issued by the upper-layer lighting service.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::LightsError;

/// How a light should flash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlashMode {
    #[default]
    None,
    /// Flash using the request's on/off timings.
    Timed,
    /// Flash driven by the hardware itself.
    Hardware,
}

/// How backlight brightness is controlled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrightnessMode {
    #[default]
    User,
    Sensor,
    LowPersistence,
}

/// One light request. Copied into controller state; never borrowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LightState {
    /// Packed `0xAARRGGBB`.
    pub color: u32,
    pub flash_mode: FlashMode,
    pub flash_on_ms: i32,
    pub flash_off_ms: i32,
    pub brightness_mode: BrightnessMode,
}

impl LightState {
    /// A steady request with the given color and default modes.
    pub fn with_color(color: u32) -> Self {
        LightState {
            color,
            ..Self::default()
        }
    }

    /// A timed flash request.
    pub fn timed(color: u32, on_ms: i32, off_ms: i32) -> Self {
        LightState {
            color,
            flash_mode: FlashMode::Timed,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
            ..Self::default()
        }
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlashMode::None => "none",
            FlashMode::Timed => "timed",
            FlashMode::Hardware => "hardware",
        })
    }
}

impl FromStr for FlashMode {
    type Err = LightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FlashMode::None),
            "timed" => Ok(FlashMode::Timed),
            "hardware" => Ok(FlashMode::Hardware),
            other => Err(LightsError::InvalidArgument(format!(
                "unknown flash mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for BrightnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrightnessMode::User => "user",
            BrightnessMode::Sensor => "sensor",
            BrightnessMode::LowPersistence => "low-persistence",
        })
    }
}

impl FromStr for BrightnessMode {
    type Err = LightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(BrightnessMode::User),
            "sensor" => Ok(BrightnessMode::Sensor),
            "low-persistence" | "low_persistence" => Ok(BrightnessMode::LowPersistence),
            other => Err(LightsError::InvalidArgument(format!(
                "unknown brightness mode: {other}"
            ))),
        }
    }
}
