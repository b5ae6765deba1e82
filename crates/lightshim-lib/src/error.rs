//! Unified error type for the lightshim-lib crate.
//!
//! [`LightsError`] covers control-file I/O, invalid light kinds, missing
//! device handles, and configuration/color parsing problems. [`LightsError::status`]
//! maps each variant onto the integer status surface used by [`crate::hal`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// `EINVAL`: invalid argument.
pub const EINVAL: i32 = 22;
/// `EIO`: used when an I/O error carries no OS error code.
pub const EIO: i32 = 5;
/// Status returned when a setter is called without a device handle.
pub const STATUS_NO_DEVICE: i32 = -1;

/// Unified error type for lightshim-lib operations.
#[derive(Debug)]
pub enum LightsError {
    /// Unsupported light kind, or a kind whose control file is absent at open.
    InvalidArgument(String),
    /// A setter was invoked without a device handle.
    NoDevice,
    /// Writing a control file failed.
    Io { path: PathBuf, source: io::Error },
    /// Configuration validation or persistence error.
    Config(String),
    /// Color parsing error.
    Color(String),
}

impl LightsError {
    /// Integer status for this error: negated errno, `-EINVAL`, or `-1`.
    pub fn status(&self) -> i32 {
        match self {
            LightsError::InvalidArgument(_) | LightsError::Config(_) | LightsError::Color(_) => {
                -EINVAL
            }
            LightsError::NoDevice => STATUS_NO_DEVICE,
            LightsError::Io { source, .. } => -source.raw_os_error().unwrap_or(EIO),
        }
    }
}

impl fmt::Display for LightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightsError::InvalidArgument(e) => write!(f, "Invalid argument: {e}"),
            LightsError::NoDevice => write!(f, "No light device"),
            LightsError::Io { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
            LightsError::Config(e) => write!(f, "Config error: {e}"),
            LightsError::Color(e) => write!(f, "Color error: {e}"),
        }
    }
}

impl std::error::Error for LightsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LightsError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Crate-level Result alias using [`LightsError`].
pub type Result<T> = std::result::Result<T, LightsError>;

/// Collapse a result into the integer status surface (0 on success).
pub fn status_of<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.status(),
    }
}
