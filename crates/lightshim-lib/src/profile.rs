//! Keyboard hardware profile, resolved once from two property strings.

use std::fmt;

use serde::Serialize;

/// Revision assumed when the MCU version property is missing or malformed.
pub const DEFAULT_REVISION: i32 = 4;

/// Board tag assumed when the board config property is missing.
pub const DEFAULT_BOARD: &str = "portable";

/// Revisions from this one on have a full RGB keyboard LED with no floor.
pub const RGB_REVISION: i32 = 7;

const SMARTCAM: &str = "smartcam";

/// Keyboard hardware variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardwareProfile {
    pub revision: i32,
    pub board: String,
}

impl Default for HardwareProfile {
    fn default() -> Self {
        HardwareProfile {
            revision: DEFAULT_REVISION,
            board: DEFAULT_BOARD.into(),
        }
    }
}

impl HardwareProfile {
    /// Resolve from the MCU version and board config property values.
    ///
    /// The revision digit sits at byte 2 for versions starting with `A`
    /// (e.g. `"A.8"`), and at byte 0 otherwise (e.g. `"5.1.0"`). Anything shorter
    /// than three bytes, or with a non-alphanumeric byte 2, means revision 4.
    pub fn from_properties(mcu_version: Option<&str>, board_config: Option<&str>) -> Self {
        let revision = match mcu_version.map(str::as_bytes) {
            Some(v) if v.len() >= 3 && v[2].is_ascii_alphanumeric() => {
                let digit = if v[0] == b'A' { v[2] } else { v[0] };
                i32::from(digit) - i32::from(b'0')
            }
            _ => DEFAULT_REVISION,
        };
        let board = match board_config {
            Some(b) if !b.is_empty() => b.to_string(),
            _ => DEFAULT_BOARD.to_string(),
        };
        HardwareProfile { revision, board }
    }

    /// Smartcam boards below the RGB revision only have a single-bit LED.
    pub fn is_single_bit(&self) -> bool {
        self.board.starts_with(SMARTCAM) && self.revision < RGB_REVISION
    }

    /// Whether dim channels are raised to the visibility floor.
    pub fn needs_floor(&self) -> bool {
        self.revision < RGB_REVISION
    }
}

impl fmt::Display for HardwareProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "revision {} on {}", self.revision, self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_properties_use_defaults() {
        let p = HardwareProfile::from_properties(None, None);
        assert_eq!(p, HardwareProfile::default());
        assert_eq!(p.revision, 4);
        assert_eq!(p.board, "portable");
    }

    #[test]
    fn leading_digit_revision() {
        assert_eq!(HardwareProfile::from_properties(Some("8.0.1"), None).revision, 8);
        assert_eq!(HardwareProfile::from_properties(Some("5.12"), None).revision, 5);
    }

    #[test]
    fn a_prefixed_revision_uses_third_byte() {
        assert_eq!(HardwareProfile::from_properties(Some("A.7"), None).revision, 7);
        assert_eq!(HardwareProfile::from_properties(Some("A-3x"), None).revision, 3);
    }

    #[test]
    fn short_version_defaults() {
        assert_eq!(HardwareProfile::from_properties(Some("9"), None).revision, 4);
        assert_eq!(HardwareProfile::from_properties(Some(""), None).revision, 4);
    }

    #[test]
    fn non_alnum_third_byte_defaults() {
        assert_eq!(HardwareProfile::from_properties(Some("9..1"), None).revision, 4);
    }

    #[test]
    fn empty_board_is_portable() {
        assert_eq!(HardwareProfile::from_properties(None, Some("")).board, "portable");
    }

    #[test]
    fn smartcam_below_rgb_revision_is_single_bit() {
        let p = HardwareProfile::from_properties(Some("5.0"), Some("smartcam"));
        assert!(p.is_single_bit());
        let p = HardwareProfile::from_properties(Some("5.0"), Some("smartcam_v2"));
        assert!(p.is_single_bit());
    }

    #[test]
    fn smartcam_at_rgb_revision_is_rgb() {
        let p = HardwareProfile::from_properties(Some("7.0"), Some("smartcam"));
        assert!(!p.is_single_bit());
        assert!(!p.needs_floor());
    }

    #[test]
    fn portable_below_seven_needs_floor() {
        let p = HardwareProfile::from_properties(Some("6.0"), Some("portable"));
        assert!(!p.is_single_bit());
        assert!(p.needs_floor());
    }
}
