//! Application configuration: TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::LightPaths;
use crate::profile::HardwareProfile;
use crate::sysfs::SysFs;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str = "# lightshim configuration\n\n";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Prefix for every control path. Empty = the real filesystem root.
    #[serde(default)]
    pub root: String,

    /// Control file locations.
    #[serde(default)]
    pub paths: LightPaths,

    /// Property values the keyboard hardware profile is resolved from.
    #[serde(default)]
    pub hardware: HardwareConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// MCU firmware version string, e.g. `"A.8"` or `"5.1.0"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcu_version: Option<String>,

    /// Board configuration tag, e.g. `"portable"` or `"smartcam"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_config: Option<String>,
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A `[paths]` entry is empty.
    EmptyPath(&'static str),
    /// A `[paths]` entry is not absolute.
    RelativePath { key: &'static str, path: PathBuf },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPath(key) => write!(f, "paths.{key} is empty"),
            ValidationError::RelativePath { key, path } => {
                write!(f, "paths.{key} must be absolute, got {}", path.display())
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lightshim"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        let io_err = |source: std::io::Error| crate::LightsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let serialized = toml::to_string_pretty(self)
            .map_err(|e| crate::LightsError::Config(format!("serialize: {e}")))?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents).map_err(io_err)?;
        if std::fs::rename(&tmp, path).is_err() {
            // Rename can fail across filesystems; fall back to direct write + cleanup
            let result = std::fs::write(path, &contents);
            let _ = std::fs::remove_file(&tmp);
            result.map_err(io_err)?;
        }
        Ok(())
    }

    /// Resolve the keyboard hardware profile from `[hardware]`.
    pub fn profile(&self) -> HardwareProfile {
        HardwareProfile::from_properties(
            self.hardware.mcu_version.as_deref(),
            self.hardware.board_config.as_deref(),
        )
    }

    /// Control files under the configured root.
    pub fn control_fs(&self) -> SysFs {
        SysFs::with_root(&self.root)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        for (key, path) in self.paths.entries() {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::EmptyPath(key));
            } else if !path.is_absolute() {
                errors.push(ValidationError::RelativePath {
                    key,
                    path: path.to_path_buf(),
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
