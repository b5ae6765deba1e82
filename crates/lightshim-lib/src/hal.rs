//! Integer status surface, shaped like the HAL entry points the lighting
//! service calls: `0` on success, a negated errno on I/O failure, `-EINVAL`
//! for unsupported kinds, and `-1` when no device handle is supplied.

use std::sync::Arc;

use crate::error::{LightsError, status_of};
use crate::module::{LightDevice, LightModule};
use crate::state::LightState;
use crate::sysfs::ControlFs;

/// Open `name` on `module`, storing the handle in `device` on success.
/// `device` is left untouched on failure.
pub fn open_lights<F: ControlFs>(
    module: &Arc<LightModule<F>>,
    name: &str,
    device: &mut Option<LightDevice<F>>,
) -> i32 {
    match module.open(name) {
        Ok(dev) => {
            *device = Some(dev);
            0
        }
        Err(e) => {
            log::warn!("open_lights({name}): {e}");
            e.status()
        }
    }
}

pub fn set_light<F: ControlFs>(device: Option<&LightDevice<F>>, state: &LightState) -> i32 {
    match device {
        Some(dev) => status_of(&dev.set_light(state)),
        None => LightsError::NoDevice.status(),
    }
}

pub fn close_lights<F: ControlFs>(device: Option<LightDevice<F>>) -> i32 {
    if let Some(dev) = device {
        dev.close();
    }
    0
}
