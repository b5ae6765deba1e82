//! `set` subcommand: open one light and apply a single request.

use std::sync::Arc;

use lightshim_lib::{LightModule, LightState};

use super::{
    BrightnessMode, FlashMode, GlobalOpts, Result, SetOutput, kv, kv_width, led, load_config,
    print_json,
};

/// Flash and brightness options for one `set` call.
pub(super) struct SetRequest {
    pub flash: FlashMode,
    pub on_ms: i32,
    pub off_ms: i32,
    pub mode: BrightnessMode,
}

/// Build the light state handed to the device.
fn build_state(color: u32, req: &SetRequest) -> LightState {
    LightState {
        color,
        flash_mode: req.flash,
        flash_on_ms: req.on_ms,
        flash_off_ms: req.off_ms,
        brightness_mode: req.mode,
    }
}

pub(super) fn cmd_set(opts: &GlobalOpts, kind: &str, color: &str, req: SetRequest) -> Result<()> {
    let color = led::parse_color(color)?;
    let state = build_state(color, &req);

    let config = load_config(opts);
    let module = Arc::new(LightModule::from_config(&config));
    let device = module.open(kind)?;
    device.set_light(&state)?;
    let kind = device.kind();
    device.close();

    let snapshot = module.snapshot();

    if opts.json {
        return print_json(&SetOutput {
            kind: kind.to_string(),
            color: led::format_color(color),
            brightness: led::brightness(color),
            request: state,
            state: snapshot,
        });
    }

    let w = kv_width(&["Light:", "Color:", "Brightness:", "Flash:", "Mode:"], &[]);
    kv("Light:", kind, w);
    kv("Color:", led::format_color(color), w);
    kv("Brightness:", led::brightness(color), w);
    match state.flash_mode {
        FlashMode::Timed => kv(
            "Flash:",
            format_args!("timed ({} ms on, {} ms off)", state.flash_on_ms, state.flash_off_ms),
            w,
        ),
        FlashMode::Hardware => kv(
            "Flash:",
            format_args!("hardware ({} ms)", state.flash_on_ms),
            w,
        ),
        FlashMode::None => kv("Flash:", "none", w),
    }
    kv("Mode:", state.brightness_mode, w);
    Ok(())
}
