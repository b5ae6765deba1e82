//! `profile` subcommand: show the keyboard hardware profile.

use super::{GlobalOpts, ProfileOutput, Result, kv, kv_indent, kv_width, load_config, print_json};

fn collect_profile(config: &super::Config) -> ProfileOutput {
    let profile = config.profile();
    ProfileOutput {
        mcu_version: config.hardware.mcu_version.clone(),
        board_config: config.hardware.board_config.clone(),
        single_bit: profile.is_single_bit(),
        keyboard_floor: profile.needs_floor(),
        revision: profile.revision,
        board: profile.board,
    }
}

fn print_profile(output: &ProfileOutput, json: bool) -> Result<()> {
    if json {
        return print_json(output);
    }

    let w = kv_width(
        &["Revision:", "Board:", "Keyboard:"],
        &["mcu_version:", "board_config:"],
    );
    kv("Revision:", output.revision, w);
    kv("Board:", &output.board, w);
    let keyboard = if output.single_bit {
        "single-bit (aled)"
    } else if output.keyboard_floor {
        "rgb (vled0/vled1), dim channels floored"
    } else {
        "rgb (vled0/vled1)"
    };
    kv("Keyboard:", keyboard, w);
    println!();

    println!("Properties:");
    kv_indent(
        "mcu_version:",
        output.mcu_version.as_deref().unwrap_or("(unset)"),
        w,
    );
    kv_indent(
        "board_config:",
        output.board_config.as_deref().unwrap_or("(unset)"),
        w,
    );
    Ok(())
}

pub(super) fn cmd_profile(opts: &GlobalOpts) -> Result<()> {
    let config = load_config(opts);
    print_profile(&collect_profile(&config), opts.json)
}
