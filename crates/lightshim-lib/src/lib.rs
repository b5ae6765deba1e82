//! lightshim: drives backlight, indicator, button and keyboard LEDs through
//! kernel control files on behalf of a platform lighting service.

pub mod config;
pub mod controller;
pub mod error;
pub mod hal;
pub mod kind;
pub mod led;
pub mod module;
pub mod paths;
pub mod profile;
pub mod state;
pub mod sysfs;

pub use error::LightsError;
pub use kind::LightKind;
pub use module::{LightDevice, LightModule};
pub use state::{BrightnessMode, FlashMode, LightState};
