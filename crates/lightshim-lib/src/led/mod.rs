//! Indicator LED encoding: brightness, endpoints, and request fan-out.

mod arbiter;
mod color;
mod endpoint;

pub use arbiter::{
    BLINK_ASYMMETRIC, BLINK_OFF, BLINK_SYMMETRIC, apply_to_leds, blink_mode, mask_battery,
    mask_notification,
};
pub use color::{brightness, channels, format_color, parse_color};
pub use endpoint::{Channel, LedSet, PhysicalLed};
