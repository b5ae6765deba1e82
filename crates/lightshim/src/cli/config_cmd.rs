//! `config` subcommand: show current configuration and file path.

use super::{
    ConfigOutput, GlobalOpts, LightsError, Result, config_path, kv, kv_indent, kv_width,
    load_config, print_json,
};

pub(super) fn cmd_config(opts: &GlobalOpts, save: bool) -> Result<()> {
    let config = load_config(opts);
    let path = config_path(opts);
    if save {
        let target = path
            .as_deref()
            .ok_or_else(|| LightsError::Config("no config directory to save to".into()))?;
        config.save_to(target)?;
        log::info!("saved config to {}", target.display());
    }
    let exists = path.as_ref().is_some_and(|p| p.exists());
    let errors: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };

    if opts.json {
        return print_json(&ConfigOutput {
            config_file: path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: exists,
            settings: config,
            errors,
        });
    }

    let entries = config.paths.entries();
    let keys: Vec<String> = entries.iter().map(|(k, _)| format!("{k}:")).collect();
    let mut indent: Vec<&str> = keys.iter().map(String::as_str).collect();
    indent.extend(["root:", "mcu_version:", "board_config:"]);
    let w = kv_width(&["Config file:"], &indent);

    match &path {
        Some(p) if exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    let root = if config.root.is_empty() {
        "(none)"
    } else {
        config.root.as_str()
    };
    kv_indent("root:", root, w);
    let unset = |v: &Option<String>| v.clone().unwrap_or_else(|| "(unset)".to_string());
    kv_indent("mcu_version:", unset(&config.hardware.mcu_version), w);
    kv_indent("board_config:", unset(&config.hardware.board_config), w);
    println!();

    println!("Paths:");
    for (key, (_, p)) in keys.iter().zip(&entries) {
        kv_indent(key, p.display(), w);
    }

    if !errors.is_empty() {
        println!();
        println!("Problems:");
        for e in &errors {
            println!("  {e}");
        }
    }
    Ok(())
}
