//! Color handling: perceptual brightness and `0xAARRGGBB` parsing/formatting.

/// Perceptual brightness of a packed color, in `0..=255`.
///
/// Alpha is ignored. Weights are 77/150/29 out of 256.
pub fn brightness(color: u32) -> u32 {
    let color = color & 0x00FF_FFFF;
    let (r, g, b) = ((color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF);
    (77 * r + 150 * g + 29 * b) >> 8
}

/// Split a packed color into `(alpha, red, green, blue)`.
pub fn channels(color: u32) -> (u32, u32, u32, u32) {
    (
        (color >> 24) & 0xFF,
        (color >> 16) & 0xFF,
        (color >> 8) & 0xFF,
        color & 0xFF,
    )
}

/// Parse a color string into `0xAARRGGBB`.
///
/// Accepts:
/// - Hex: `"#RRGGBB"`, `"#AARRGGBB"`, `"0xAARRGGBB"`, with or without prefix
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`, `"purple"`, `"cyan"`, `"off"`
///
/// Six-digit and named colors carry a zero alpha byte.
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0x00FF_0000),
        "green" => return Ok(0x0000_FF00),
        "blue" => return Ok(0x0000_00FF),
        "white" => return Ok(0x00FF_FFFF),
        "orange" => return Ok(0x00FF_8000),
        "yellow" => return Ok(0x00FF_FF00),
        "purple" => return Ok(0x0080_00FF),
        "cyan" => return Ok(0x0000_FFFF),
        "off" | "black" => return Ok(0),
        _ => {}
    }

    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if hex.len() != 6 && hex.len() != 8 {
        return Err(crate::LightsError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #AARRGGBB or a color name)"
        )));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|_| crate::LightsError::Color(format!("Invalid hex color: {s}")))
}

/// Format a packed color as `#AARRGGBB`.
pub fn format_color(val: u32) -> String {
    format!("#{val:08X}")
}
