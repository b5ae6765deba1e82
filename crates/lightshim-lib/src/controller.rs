//! Per-kind controllers and the arbitration state they share.
//!
//! A [`Controller`] owns the file writer, the control paths, the keyboard
//! hardware profile and the [`ArbitrationState`]. It is not synchronized
//! itself; [`crate::module::LightModule`] keeps it behind its single lock.

use serde::Serialize;

use crate::error::Result;
use crate::kind::LightKind;
use crate::led::{self, LedSet, PhysicalLed};
use crate::paths::LightPaths;
use crate::profile::HardwareProfile;
use crate::state::{BrightnessMode, FlashMode, LightState};
use crate::sysfs::{ControlFs, FileWriter};

/// Backlight level applied when entering low-persistence mode.
pub const LOW_PERSISTENCE_BRIGHTNESS: u32 = 0x80;

/// Minimum keyboard channel level on pre-RGB hardware.
pub const KEYBOARD_FLOOR: u32 = 0x0F;

/// Last-known requests, kept for the lifetime of the module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArbitrationState {
    pub notification: LightState,
    pub battery: LightState,
    /// Hardware attention flash duration in milliseconds (0 = none).
    pub attention_ms: i32,
    pub backlight_mode: BrightnessMode,
}

/// Keyboard LED value: RGB with dim channels floored on pre-RGB hardware,
/// and half the brightness packed into the top byte.
pub fn keyboard_color(color: u32, profile: &HardwareProfile) -> u32 {
    let mut rgb = color & 0x00FF_FFFF;
    if profile.needs_floor() {
        for shift in [16, 8, 0] {
            if (rgb >> shift) & 0xFF <= KEYBOARD_FLOOR {
                rgb |= KEYBOARD_FLOOR << shift;
            }
        }
    }
    rgb + (((led::brightness(color) / 2) << 24) & 0xFF00_0000)
}

#[derive(Debug)]
pub struct Controller<F> {
    writer: FileWriter<F>,
    paths: LightPaths,
    profile: HardwareProfile,
    state: ArbitrationState,
}

impl<F: ControlFs> Controller<F> {
    pub fn new(fs: F, paths: LightPaths, profile: HardwareProfile) -> Self {
        Controller {
            writer: FileWriter::new(fs),
            paths,
            profile,
            state: ArbitrationState::default(),
        }
    }

    pub fn state(&self) -> &ArbitrationState {
        &self.state
    }

    pub fn paths(&self) -> &LightPaths {
        &self.paths
    }

    pub fn profile(&self) -> &HardwareProfile {
        &self.profile
    }

    pub fn writer(&self) -> &FileWriter<F> {
        &self.writer
    }

    /// Dispatch a request to the controller for `kind`.
    pub fn set(&mut self, kind: LightKind, request: &LightState) -> Result<()> {
        match kind {
            LightKind::Backlight => self.set_backlight(request),
            LightKind::Battery => self.set_battery(request),
            LightKind::Notifications => self.set_notifications(request),
            LightKind::Attention => self.set_attention(request),
            LightKind::Buttons => self.set_buttons(request),
            LightKind::Keyboard => self.set_keyboard(request),
        }
    }

    // ── Backlight ──

    /// Write the request's brightness to the backlight.
    ///
    /// A transition into or out of low persistence first toggles the
    /// persistence file; entering it successfully pins brightness to
    /// [`LOW_PERSISTENCE_BRIGHTNESS`]. A failed toggle is logged and the
    /// brightness write still happens.
    pub fn set_backlight(&mut self, request: &LightState) -> Result<()> {
        let mut brightness = led::brightness(request.color);
        let low_persistence = request.brightness_mode == BrightnessMode::LowPersistence;
        let last = self.state.backlight_mode;

        let entering = low_persistence && last != request.brightness_mode;
        let leaving = !low_persistence && last == BrightnessMode::LowPersistence;
        if entering || leaving {
            match self
                .writer
                .write_int(&self.paths.persistence, u32::from(low_persistence))
            {
                Ok(()) if low_persistence => brightness = LOW_PERSISTENCE_BRIGHTNESS,
                Ok(()) => {}
                Err(e) => log::error!("backlight: persistence toggle failed: {e}"),
            }
        }

        // Recorded even if the toggle failed, so it is not retried every call.
        self.state.backlight_mode = request.brightness_mode;

        let target = if self.writer.exists(&self.paths.lcd_backlight) {
            &self.paths.lcd_backlight
        } else {
            &self.paths.panel_backlight
        };
        self.writer.write_int(target, brightness)
    }

    // ── Indicator LEDs ──

    pub fn set_battery(&mut self, request: &LightState) -> Result<()> {
        self.state.battery = *request;
        self.state.battery.color = led::mask_battery(request.color);
        self.handle_arbitration(LightKind::Battery);
        Ok(())
    }

    pub fn set_notifications(&mut self, request: &LightState) -> Result<()> {
        self.state.notification = *request;
        self.state.notification.color = led::mask_notification(request.color);
        self.handle_arbitration(LightKind::Notifications);
        Ok(())
    }

    /// Record the hardware flash duration and re-apply the notification LEDs.
    /// Timed requests leave the stored duration unchanged.
    pub fn set_attention(&mut self, request: &LightState) -> Result<()> {
        match request.flash_mode {
            FlashMode::Hardware => self.state.attention_ms = request.flash_on_ms,
            FlashMode::None => self.state.attention_ms = 0,
            FlashMode::Timed => {}
        }
        self.handle_arbitration(LightKind::Attention);
        Ok(())
    }

    /// Battery updates drive the single primary red LED; every other source
    /// re-applies the notification state across all stacked positions.
    fn handle_arbitration(&mut self, source: LightKind) {
        let (request, leds) = match source {
            LightKind::Battery => (self.state.battery, LedSet::from_leds(&[PhysicalLed::Red0])),
            _ => (self.state.notification, LedSet::all()),
        };
        led::apply_to_leds(&mut self.writer, &self.paths, &request, leds);
    }

    // ── Buttons / keyboard ──

    pub fn set_buttons(&mut self, request: &LightState) -> Result<()> {
        self.writer
            .write_int(&self.paths.button_backlight, request.color & 0xFF)
    }

    /// Single-bit boards get the low color bit on the auxiliary LED; everyone
    /// else gets [`keyboard_color`] on both virtual LEDs. Both virtual LEDs are
    /// always attempted and the first failure is returned.
    pub fn set_keyboard(&mut self, request: &LightState) -> Result<()> {
        if self.profile.is_single_bit() {
            return self.writer.write_int(&self.paths.aled, request.color & 1);
        }

        let value = keyboard_color(request.color, &self.profile);
        let first = self.writer.write_int(&self.paths.vled0, value);
        if let Err(e) = &first {
            log::error!("keyboard: vled0 write failed: {e}");
        }
        let second = self.writer.write_int(&self.paths.vled1, value);
        if let Err(e) = &second {
            log::error!("keyboard: vled1 write failed: {e}");
        }
        first.and(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysfs::mock::MockFs;

    fn controller(fs: &MockFs) -> Controller<&MockFs> {
        Controller::new(fs, LightPaths::default(), HardwareProfile::default())
    }

    fn with_profile<'a>(fs: &'a MockFs, mcu: &str, board: &str) -> Controller<&'a MockFs> {
        Controller::new(
            fs,
            LightPaths::default(),
            HardwareProfile::from_properties(Some(mcu), Some(board)),
        )
    }

    fn p() -> LightPaths {
        LightPaths::default()
    }

    fn backlight(color: u32, mode: BrightnessMode) -> LightState {
        LightState {
            color,
            brightness_mode: mode,
            ..LightState::default()
        }
    }

    // ── keyboard_color ──

    #[test]
    fn floor_applies_below_revision_seven() {
        let profile = HardwareProfile::from_properties(Some("4.0"), None);
        let packed = keyboard_color(0x0005_0505, &profile);
        assert_eq!(packed & 0x00FF_FFFF, 0x000F_0F0F);
    }

    #[test]
    fn no_floor_from_revision_seven() {
        let profile = HardwareProfile::from_properties(Some("8.0"), None);
        let packed = keyboard_color(0x0005_0505, &profile);
        assert_eq!(packed & 0x00FF_FFFF, 0x0005_0505);
    }

    #[test]
    fn floor_leaves_bright_channels_alone() {
        let profile = HardwareProfile::default();
        let packed = keyboard_color(0x0080_1000, &profile);
        assert_eq!(packed & 0x00FF_FFFF, 0x0080_100F);
    }

    #[test]
    fn top_byte_is_half_brightness_of_request() {
        let profile = HardwareProfile::from_properties(Some("8.0"), None);
        assert_eq!(keyboard_color(0xFFFF_FFFF, &profile), 0x7FFF_FFFF);
        // Brightness comes from the request, not the floored color.
        let profile = HardwareProfile::default();
        assert_eq!(keyboard_color(0, &profile), 0x000F_0F0F);
    }

    // ── backlight ──

    #[test]
    fn backlight_writes_legacy_path_when_present() {
        let fs = MockFs::new();
        fs.add(p().lcd_backlight);
        let mut c = controller(&fs);
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::User))
            .unwrap();
        assert_eq!(fs.written(), vec![(p().lcd_backlight, 255)]);
    }

    #[test]
    fn backlight_falls_back_when_legacy_absent() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_backlight(&backlight(0x0000_0000, BrightnessMode::User))
            .unwrap();
        assert_eq!(fs.written(), vec![(p().panel_backlight, 0)]);
    }

    #[test]
    fn backlight_path_is_rechecked_each_call() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::User))
            .unwrap();
        fs.add(p().lcd_backlight);
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::User))
            .unwrap();
        assert_eq!(
            fs.paths(),
            vec![p().panel_backlight, p().lcd_backlight]
        );
    }

    #[test]
    fn entering_low_persistence_toggles_and_pins_brightness() {
        let fs = MockFs::new();
        fs.add(p().lcd_backlight);
        let mut c = controller(&fs);
        c.set_backlight(&backlight(0x0010_1010, BrightnessMode::LowPersistence))
            .unwrap();
        assert_eq!(
            fs.written(),
            vec![(p().persistence, 1), (p().lcd_backlight, 0x80)]
        );
        assert_eq!(c.state().backlight_mode, BrightnessMode::LowPersistence);
    }

    #[test]
    fn repeated_low_persistence_does_not_retoggle() {
        let fs = MockFs::new();
        fs.add(p().lcd_backlight);
        let mut c = controller(&fs);
        let req = backlight(0x00FF_FFFF, BrightnessMode::LowPersistence);
        c.set_backlight(&req).unwrap();
        c.set_backlight(&req).unwrap();
        assert_eq!(fs.values(p().persistence), vec![1]);
        // Without a transition the computed brightness is used.
        assert_eq!(fs.values(p().lcd_backlight), vec![0x80, 255]);
    }

    #[test]
    fn leaving_low_persistence_writes_zero() {
        let fs = MockFs::new();
        fs.add(p().lcd_backlight);
        let mut c = controller(&fs);
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::LowPersistence))
            .unwrap();
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::Sensor))
            .unwrap();
        assert_eq!(fs.values(p().persistence), vec![1, 0]);
        assert_eq!(fs.last(p().lcd_backlight), Some(255));
    }

    #[test]
    fn user_to_sensor_is_not_a_transition() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::Sensor))
            .unwrap();
        assert!(fs.values(p().persistence).is_empty());
    }

    #[test]
    fn failed_toggle_still_writes_computed_brightness() {
        let fs = MockFs::new();
        fs.add(p().lcd_backlight);
        fs.fail(p().persistence, 2);
        let mut c = controller(&fs);
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::LowPersistence))
            .unwrap();
        assert_eq!(fs.values(p().lcd_backlight), vec![255]);
        assert_eq!(c.state().backlight_mode, BrightnessMode::LowPersistence);

        // Mode was recorded, so the identical request does not retry the toggle.
        fs.clear();
        c.set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::LowPersistence))
            .unwrap();
        assert_eq!(fs.paths(), vec![p().lcd_backlight]);
    }

    #[test]
    fn backlight_error_is_brightness_write_error() {
        let fs = MockFs::new();
        fs.fail(p().panel_backlight, 13);
        let mut c = controller(&fs);
        let err = c
            .set_backlight(&backlight(0x00FF_FFFF, BrightnessMode::User))
            .unwrap_err();
        assert_eq!(err.status(), -13);
    }

    // ── battery / notifications / attention ──

    #[test]
    fn battery_drives_primary_red_only() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_battery(&LightState::with_color(0x00FF_FFFF)).unwrap();
        assert_eq!(fs.written(), vec![(p().red, 0xFF)]);
        assert_eq!(c.state().battery.color, 0x00FF_0000);
    }

    #[test]
    fn notification_fans_out_with_flag_alpha() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_notifications(&LightState::with_color(0x3003_FFFF))
            .unwrap();
        assert_eq!(fs.written().len(), 9);
        assert_eq!(c.state().notification.color, 0x3003_FFFF);
    }

    #[test]
    fn notification_plain_alpha_clears_red() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_notifications(&LightState::with_color(0xFFFF_8040))
            .unwrap();
        assert_eq!(
            fs.written(),
            vec![(p().red, 0), (p().green, 0x80), (p().blue, 0x40)]
        );
    }

    #[test]
    fn battery_then_notification_shows_notification() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_battery(&LightState::with_color(0x00FF_0000)).unwrap();
        fs.clear();
        c.set_notifications(&LightState::with_color(0x0000_1122))
            .unwrap();
        assert_eq!(
            fs.written(),
            vec![(p().red, 0), (p().green, 0x11), (p().blue, 0x22)]
        );
    }

    #[test]
    fn notification_then_battery_shows_battery_only() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_notifications(&LightState::with_color(0x0000_1122))
            .unwrap();
        fs.clear();
        c.set_battery(&LightState::with_color(0x0080_0000)).unwrap();
        assert_eq!(fs.written(), vec![(p().red, 0x80)]);
    }

    #[test]
    fn attention_hardware_records_duration_and_reapplies_notification() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_notifications(&LightState::with_color(0x0000_00FF))
            .unwrap();
        fs.clear();
        let req = LightState {
            flash_mode: FlashMode::Hardware,
            flash_on_ms: 250,
            ..LightState::default()
        };
        c.set_attention(&req).unwrap();
        assert_eq!(c.state().attention_ms, 250);
        assert_eq!(
            fs.written(),
            vec![(p().red, 0), (p().green, 0), (p().blue, 0xFF)]
        );
        assert_eq!(c.state().notification.color, 0x0000_00FF);
    }

    #[test]
    fn attention_none_clears_timed_keeps() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        let hw = LightState {
            flash_mode: FlashMode::Hardware,
            flash_on_ms: 250,
            ..LightState::default()
        };
        c.set_attention(&hw).unwrap();
        c.set_attention(&LightState::timed(0, 100, 100)).unwrap();
        assert_eq!(c.state().attention_ms, 250);
        c.set_attention(&LightState::default()).unwrap();
        assert_eq!(c.state().attention_ms, 0);
    }

    #[test]
    fn repeated_notification_is_idempotent() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        let req = LightState::with_color(0x2001_0203);
        c.set_notifications(&req).unwrap();
        let first = fs.written();
        fs.clear();
        c.set_notifications(&req).unwrap();
        assert_eq!(fs.written(), first);
    }

    #[test]
    fn repeated_battery_is_idempotent() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        let req = LightState::with_color(0x00C0_4020);
        c.set_battery(&req).unwrap();
        let first = fs.written();
        assert_eq!(first, vec![(p().red, 0xC0)]);
        fs.clear();
        c.set_battery(&req).unwrap();
        assert_eq!(fs.written(), first);
    }

    #[test]
    fn repeated_keyboard_is_idempotent() {
        for (mcu, board) in [("4.0", "portable"), ("8.0", "portable"), ("5.0", "smartcam")] {
            let fs = MockFs::new();
            let mut c = with_profile(&fs, mcu, board);
            let req = LightState::with_color(0x0005_80FF);
            c.set_keyboard(&req).unwrap();
            let first = fs.written();
            assert!(!first.is_empty());
            fs.clear();
            c.set_keyboard(&req).unwrap();
            assert_eq!(fs.written(), first, "profile {mcu}/{board}");
        }
    }

    #[test]
    fn indicator_write_failure_is_not_reported() {
        let fs = MockFs::new();
        fs.fail(p().red_1, 2);
        let mut c = controller(&fs);
        assert!(
            c.set_notifications(&LightState::with_color(0x30FF_FFFF))
                .is_ok()
        );
        assert!(c.writer().has_warned(&p().red_1));
    }

    // ── buttons / keyboard ──

    #[test]
    fn buttons_write_low_byte() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set_buttons(&LightState::with_color(0xFF12_34AB)).unwrap();
        assert_eq!(fs.written(), vec![(p().button_backlight, 0xAB)]);
    }

    #[test]
    fn keyboard_writes_both_virtual_leds() {
        let fs = MockFs::new();
        let mut c = with_profile(&fs, "8.0", "portable");
        c.set_keyboard(&LightState::with_color(0x00FF_FFFF)).unwrap();
        assert_eq!(
            fs.written(),
            vec![(p().vled0, 0x7FFF_FFFF), (p().vled1, 0x7FFF_FFFF)]
        );
    }

    #[test]
    fn keyboard_attempts_second_led_after_first_fails() {
        let fs = MockFs::new();
        fs.fail(p().vled0, 2);
        let mut c = with_profile(&fs, "8.0", "portable");
        let err = c
            .set_keyboard(&LightState::with_color(0x00FF_FFFF))
            .unwrap_err();
        assert_eq!(err.status(), -2);
        assert_eq!(fs.paths(), vec![p().vled1]);
    }

    #[test]
    fn smartcam_writes_single_bit() {
        let fs = MockFs::new();
        let mut c = with_profile(&fs, "5.0", "smartcam");
        c.set_keyboard(&LightState::with_color(0x00FF_FF03)).unwrap();
        assert_eq!(fs.written(), vec![(p().aled, 1)]);
    }

    #[test]
    fn smartcam_at_revision_seven_uses_rgb() {
        let fs = MockFs::new();
        let mut c = with_profile(&fs, "7.0", "smartcam");
        c.set_keyboard(&LightState::with_color(0x0005_0505)).unwrap();
        assert_eq!(fs.paths(), vec![p().vled0, p().vled1]);
        assert_eq!(fs.last(p().vled0).map(|v| v & 0x00FF_FFFF), Some(0x0005_0505));
    }

    #[test]
    fn dispatch_routes_by_kind() {
        let fs = MockFs::new();
        let mut c = controller(&fs);
        c.set(LightKind::Buttons, &LightState::with_color(0x10)).unwrap();
        c.set(LightKind::Battery, &LightState::with_color(0x0020_0000))
            .unwrap();
        assert_eq!(
            fs.written(),
            vec![(p().button_backlight, 0x10), (p().red, 0x20)]
        );
    }
}
