//! Display screen modes.
//!
//! The module rotates its own coordinate system, so a mode change swaps the
//! reported width and height.

use crate::{Error, Result, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use std::str::FromStr;

/// Screen orientation as understood by the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenMode {
    /// Landscape (480x272).
    #[default]
    Landscape,
    /// Landscape rotated 180°.
    LandscapeReverse,
    /// Portrait (272x480).
    Portrait,
    /// Portrait rotated 180°.
    PortraitReverse,
}

impl ScreenMode {
    /// All modes in wire order.
    pub const ALL: [ScreenMode; 4] = [
        ScreenMode::Landscape,
        ScreenMode::LandscapeReverse,
        ScreenMode::Portrait,
        ScreenMode::PortraitReverse,
    ];

    /// Returns the wire value.
    pub fn word(&self) -> u16 {
        match self {
            ScreenMode::Landscape => 0,
            ScreenMode::LandscapeReverse => 1,
            ScreenMode::Portrait => 2,
            ScreenMode::PortraitReverse => 3,
        }
    }

    /// Converts a wire value back to a mode.
    pub fn from_word(value: u16) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::InvalidArgument(format!("screen mode {}", value)))
    }

    /// Returns true if this is a portrait mode.
    pub fn is_portrait(&self) -> bool {
        matches!(self, ScreenMode::Portrait | ScreenMode::PortraitReverse)
    }

    /// Returns the display dimensions for this mode.
    pub fn dimensions(&self) -> (u16, u16) {
        if self.is_portrait() {
            (DISPLAY_HEIGHT, DISPLAY_WIDTH)
        } else {
            (DISPLAY_WIDTH, DISPLAY_HEIGHT)
        }
    }
}

impl FromStr for ScreenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "landscape" => Ok(ScreenMode::Landscape),
            "landscape-reverse" | "landscape_reverse" => Ok(ScreenMode::LandscapeReverse),
            "portrait" => Ok(ScreenMode::Portrait),
            "portrait-reverse" | "portrait_reverse" => Ok(ScreenMode::PortraitReverse),
            _ => Err(Error::InvalidArgument(format!("screen mode {:?}", s))),
        }
    }
}

impl std::fmt::Display for ScreenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenMode::Landscape => write!(f, "landscape"),
            ScreenMode::LandscapeReverse => write!(f, "landscape-reverse"),
            ScreenMode::Portrait => write!(f, "portrait"),
            ScreenMode::PortraitReverse => write!(f, "portrait-reverse"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_round_trip() {
        for mode in ScreenMode::ALL {
            assert_eq!(ScreenMode::from_word(mode.word()).unwrap(), mode);
        }
        assert!(ScreenMode::from_word(4).is_err());
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(ScreenMode::Landscape.dimensions(), (480, 272));
        assert_eq!(ScreenMode::PortraitReverse.dimensions(), (272, 480));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "landscape".parse::<ScreenMode>().unwrap(),
            ScreenMode::Landscape
        );
        assert_eq!(
            "Portrait-Reverse".parse::<ScreenMode>().unwrap(),
            ScreenMode::PortraitReverse
        );
        assert!("sideways".parse::<ScreenMode>().is_err());
        assert_eq!(ScreenMode::LandscapeReverse.to_string(), "landscape-reverse");
    }
}
