//! Light kinds and their identifiers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::LightsError;

/// A logical light the upper layer can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Backlight,
    Battery,
    Notifications,
    Attention,
    Buttons,
    Keyboard,
}

impl LightKind {
    pub const ALL: [LightKind; 6] = [
        LightKind::Backlight,
        LightKind::Battery,
        LightKind::Notifications,
        LightKind::Attention,
        LightKind::Buttons,
        LightKind::Keyboard,
    ];

    /// Identifier used to open this kind.
    pub fn id(self) -> &'static str {
        match self {
            LightKind::Backlight => "backlight",
            LightKind::Battery => "battery",
            LightKind::Notifications => "notifications",
            LightKind::Attention => "attention",
            LightKind::Buttons => "buttons",
            LightKind::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LightKind {
    type Err = LightsError;

    /// Identifiers are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LightKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| LightsError::InvalidArgument(format!("unknown light kind: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_back() {
        for kind in LightKind::ALL {
            assert_eq!(kind.id().parse::<LightKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_id_is_invalid_argument() {
        let err = "disco".parse::<LightKind>().unwrap_err();
        assert_eq!(err.status(), -22);
    }

    #[test]
    fn match_is_exact() {
        assert!("Backlight".parse::<LightKind>().is_err());
        assert!(" battery".parse::<LightKind>().is_err());
    }
}
