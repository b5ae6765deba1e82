//! `status` subcommand: show which control files exist under the root.

use lightshim_lib::paths::LightPaths;
use lightshim_lib::sysfs::ControlFs;

use super::{
    Config, FileStatusJson, GlobalOpts, Result, StatusOutput, kv, kv_indent, kv_width, load_config,
    print_json,
};

/// Presence of every configured control file.
fn collect_files(fs: &impl ControlFs, paths: &LightPaths) -> Vec<FileStatusJson> {
    paths
        .entries()
        .into_iter()
        .map(|(name, path)| FileStatusJson {
            name: name.to_string(),
            path: path.display().to_string(),
            present: fs.exists(path),
        })
        .collect()
}

/// Which backlight file a backlight request would write to, if any exists.
fn backlight_target(files: &[FileStatusJson]) -> Option<String> {
    ["lcd_backlight", "panel_backlight"]
        .into_iter()
        .find(|key| files.iter().any(|f| f.name == *key && f.present))
        .map(str::to_string)
}

fn print_status(config: &Config, files: Vec<FileStatusJson>, json: bool) -> Result<()> {
    let backlight = backlight_target(&files);
    let root = if config.root.is_empty() {
        "/".to_string()
    } else {
        config.root.clone()
    };

    if json {
        return print_json(&StatusOutput {
            version: env!("CARGO_PKG_VERSION").to_string(),
            root,
            backlight,
            files,
        });
    }

    let keys: Vec<String> = files.iter().map(|f| format!("{}:", f.name)).collect();
    let indent: Vec<&str> = keys.iter().map(String::as_str).collect();
    let w = kv_width(&["Version:", "Root:", "Backlight:"], &indent);

    kv("Version:", env!("CARGO_PKG_VERSION"), w);
    kv("Root:", &root, w);
    kv("Backlight:", backlight.as_deref().unwrap_or("not available"), w);
    println!();

    let present = files.iter().filter(|f| f.present).count();
    println!("Control files ({present}/{} present):", files.len());
    for (key, file) in keys.iter().zip(&files) {
        let mark = if file.present { "present" } else { "missing" };
        kv_indent(key, format_args!("{mark:<9}{}", file.path), w);
    }
    Ok(())
}

pub(super) fn cmd_status(opts: &GlobalOpts) -> Result<()> {
    let config = load_config(opts);
    let files = collect_files(&config.control_fs(), &config.paths);
    print_status(&config, files, opts.json)
}
