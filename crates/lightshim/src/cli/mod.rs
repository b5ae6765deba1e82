//! CLI subcommands: apply requests, inspect control files and config.

mod config_cmd;
mod profile;
mod set;
mod status;

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

pub(super) use lightshim_lib::config::Config;
pub(super) use lightshim_lib::error::{LightsError, Result};
pub(super) use lightshim_lib::led;
pub(super) use lightshim_lib::{BrightnessMode, FlashMode};

const PADDING: usize = 2;

/// Flags shared by every subcommand.
pub struct GlobalOpts {
    pub json: bool,
    pub config: Option<PathBuf>,
    pub root: Option<String>,
}

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {}", format_kv(key, value, w - 2));
}

/// Pretty-print any serializable output as JSON.
pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| LightsError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Config file in effect: `--config` if given, else the platform default.
pub(super) fn config_path(opts: &GlobalOpts) -> Option<PathBuf> {
    opts.config.clone().or_else(Config::path)
}

/// Load the config, log parse warnings, and apply `--root`.
pub(super) fn load_config(opts: &GlobalOpts) -> Config {
    let (mut config, warnings) = match &opts.config {
        Some(path) => Config::load_from(path),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    if let Some(root) = &opts.root {
        config.root = root.clone();
    }
    if let Err(errors) = config.validate() {
        for e in &errors {
            log::warn!("config: {e}");
        }
    }
    config
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub kind: String,
    pub color: String,
    pub brightness: u32,
    pub request: lightshim_lib::LightState,
    pub state: lightshim_lib::controller::ArbitrationState,
}

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub root: String,
    pub backlight: Option<String>,
    pub files: Vec<FileStatusJson>,
}

#[derive(Serialize)]
pub(super) struct FileStatusJson {
    pub name: String,
    pub path: String,
    pub present: bool,
}

#[derive(Serialize)]
pub(super) struct ProfileOutput {
    pub mcu_version: Option<String>,
    pub board_config: Option<String>,
    pub revision: i32,
    pub board: String,
    pub single_bit: bool,
    pub keyboard_floor: bool,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub errors: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a light and apply one request
    Set {
        /// Light kind (backlight, battery, notifications, attention, buttons, keyboard)
        kind: String,
        /// Color as #AARRGGBB, #RRGGBB, 0x hex, or a name (e.g. red)
        color: String,
        /// Flash mode (none, timed, hardware)
        #[arg(long, default_value = "none")]
        flash: FlashMode,
        /// Flash on time in milliseconds
        #[arg(long, default_value_t = 0)]
        on_ms: i32,
        /// Flash off time in milliseconds
        #[arg(long, default_value_t = 0)]
        off_ms: i32,
        /// Brightness mode (user, sensor, low-persistence)
        #[arg(long, default_value = "user")]
        mode: BrightnessMode,
    },

    /// List every control file and whether it is present
    Status,

    /// Show the resolved keyboard hardware profile
    Profile,

    /// Show current configuration and file path
    Config {
        /// Write the effective configuration (including --root) to the config file
        #[arg(long)]
        save: bool,
    },
}

pub fn run(cmd: Command, opts: &GlobalOpts) -> Result<()> {
    match cmd {
        Command::Set {
            kind,
            color,
            flash,
            on_ms,
            off_ms,
            mode,
        } => {
            let request = set::SetRequest {
                flash,
                on_ms,
                off_ms,
                mode,
            };
            set::cmd_set(opts, &kind, &color, request)
        }
        Command::Status => status::cmd_status(opts),
        Command::Profile => profile::cmd_profile(opts),
        Command::Config { save } => config_cmd::cmd_config(opts, save),
    }
}
