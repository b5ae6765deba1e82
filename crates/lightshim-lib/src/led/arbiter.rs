//! Indicator LED encoding: blink selection, color masks, and fan-out of one
//! request onto a set of physical endpoints.

use crate::paths::LightPaths;
use crate::state::{FlashMode, LightState};
use crate::sysfs::{ControlFs, FileWriter};

use super::color::channels;
use super::endpoint::{Channel, LedSet, PhysicalLed};

/// Blink control value: steady.
pub const BLINK_OFF: u32 = 0;
/// Blink control value: unequal on/off times.
pub const BLINK_ASYMMETRIC: u32 = 1;
/// Blink control value: equal on/off times.
pub const BLINK_SYMMETRIC: u32 = 2;

/// Alpha bits that may accompany an extended notification color.
const NOTIFICATION_FLAG_BITS: u32 = 0x30;

/// Blink control value for a request. Only timed flashes blink.
pub fn blink_mode(state: &LightState) -> u32 {
    let (on, off) = match state.flash_mode {
        FlashMode::Timed => (state.flash_on_ms, state.flash_off_ms),
        FlashMode::None | FlashMode::Hardware => (0, 0),
    };
    if on > 0 && off > 0 {
        if on == off {
            BLINK_SYMMETRIC
        } else {
            BLINK_ASYMMETRIC
        }
    } else {
        BLINK_OFF
    }
}

/// Battery requests only drive the red channel.
pub fn mask_battery(color: u32) -> u32 {
    color & 0x00FF_0000
}

/// Notification colors: any alpha bit outside the reserved flag region keeps
/// only the low 16 bits; otherwise the flag region and the low 18 bits survive.
pub fn mask_notification(color: u32) -> u32 {
    let alpha = (color >> 24) & 0xFF;
    if alpha & !NOTIFICATION_FLAG_BITS != 0 {
        color & 0x0000_FFFF
    } else {
        color & 0x3003_FFFF
    }
}

/// Write one request to the selected endpoints.
///
/// Blinking requests go to the primary blink files of every lit channel
/// regardless of `leds`; a channel whose blink file rejects the write is
/// forced off. Steady requests write full red to `Red0`, then either green
/// and blue as plain brightness (alpha zero) or one bit per stacked position
/// (alpha non-zero).
///
/// Individual write failures are reported by the writer and do not stop the
/// remaining endpoints.
pub fn apply_to_leds<F: ControlFs>(
    writer: &mut FileWriter<F>,
    paths: &LightPaths,
    state: &LightState,
    leds: LedSet,
) {
    let (alpha, red, green, blue) = channels(state.color);
    let blink = blink_mode(state);

    log::debug!(
        "apply color={:#010X} blink={blink} leds={:?}",
        state.color,
        leds.iter().collect::<Vec<_>>()
    );

    if blink != BLINK_OFF {
        for (channel, value) in [
            (Channel::Red, red),
            (Channel::Green, green),
            (Channel::Blue, blue),
        ] {
            if value == 0 {
                continue;
            }
            if writer.write_int(paths.blink(channel), blink).is_err() {
                let _ = writer.write_int(paths.brightness(PhysicalLed::primary(channel)), 0);
            }
        }
        return;
    }

    let mut write = |led: PhysicalLed, value: u32| {
        if leds.contains(led) {
            let _ = writer.write_int(paths.brightness(led), value);
        }
    };

    write(PhysicalLed::Red0, red);

    if alpha == 0 {
        write(PhysicalLed::Green0, green);
        write(PhysicalLed::Blue0, blue);
        return;
    }

    // Red0 already carries the full red value.
    let mut rgb = [red, green, blue];
    for position in 0..3 {
        for (channel, value) in Channel::ALL.into_iter().zip(rgb) {
            if position == 0 && channel == Channel::Red {
                continue;
            }
            if let Some(led) = PhysicalLed::at(channel, position) {
                write(led, value & 1);
            }
        }
        rgb = rgb.map(|v| v >> 1);
    }
}
