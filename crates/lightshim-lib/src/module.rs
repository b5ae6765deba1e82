//! The lights module: one lock, one controller, many device handles.
//!
//! [`LightModule::open`] validates a light identifier and hands out a
//! [`LightDevice`] bound to that kind. Every device of a module funnels its
//! requests through the module's single mutex, so state updates and file
//! writes for all kinds are totally ordered.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::controller::{ArbitrationState, Controller};
use crate::error::{LightsError, Result};
use crate::kind::LightKind;
use crate::paths::LightPaths;
use crate::profile::HardwareProfile;
use crate::state::LightState;
use crate::sysfs::{ControlFs, SysFs};

#[derive(Debug)]
pub struct LightModule<F> {
    controller: Mutex<Controller<F>>,
}

impl LightModule<SysFs> {
    /// Build a module over the real control files described by `config`.
    pub fn from_config(config: &Config) -> Self {
        LightModule::new(config.control_fs(), config.paths.clone(), config.profile())
    }
}

impl<F: ControlFs> LightModule<F> {
    pub fn new(fs: F, paths: LightPaths, profile: HardwareProfile) -> Self {
        log::debug!("lights module: keyboard profile {profile}");
        LightModule {
            controller: Mutex::new(Controller::new(fs, paths, profile)),
        }
    }

    /// Acquire the module lock. A poisoned lock is recovered: every
    /// mutation is a plain field store, so the state stays consistent.
    fn lock(&self) -> MutexGuard<'_, Controller<F>> {
        self.controller.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a device for the light identified by `name`.
    ///
    /// Unknown identifiers are rejected. `buttons` additionally requires the
    /// button backlight file to exist at open time.
    pub fn open(self: &Arc<Self>, name: &str) -> Result<LightDevice<F>> {
        let kind: LightKind = name.parse()?;
        if kind == LightKind::Buttons {
            let controller = self.lock();
            let path = &controller.paths().button_backlight;
            if !controller.writer().exists(path) {
                return Err(LightsError::InvalidArgument(format!(
                    "buttons: {} not present",
                    path.display()
                )));
            }
        }
        log::debug!("opened {kind} light");
        Ok(LightDevice {
            kind,
            module: Arc::clone(self),
        })
    }

    /// Apply `request` to `kind` under the module lock.
    pub fn set(&self, kind: LightKind, request: &LightState) -> Result<()> {
        self.lock().set(kind, request)
    }

    /// Copy of the current arbitration state.
    pub fn snapshot(&self) -> ArbitrationState {
        *self.lock().state()
    }

    pub fn profile(&self) -> HardwareProfile {
        self.lock().profile().clone()
    }

    pub fn paths(&self) -> LightPaths {
        self.lock().paths().clone()
    }
}

/// An open light, bound to one kind's controller.
#[derive(Debug)]
pub struct LightDevice<F> {
    kind: LightKind,
    module: Arc<LightModule<F>>,
}

impl<F: ControlFs> LightDevice<F> {
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    pub fn set_light(&self, request: &LightState) -> Result<()> {
        self.module.set(self.kind, request)
    }

    /// Release the handle. Module state is kept.
    pub fn close(self) {
        log::debug!("closed {} light", self.kind);
    }
}
