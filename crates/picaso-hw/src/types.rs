//! Typed command arguments.
//!
//! Enumerated arguments are plain enums so an out-of-range mode cannot reach
//! the wire.

use crate::{Error, Result};
use std::ops::BitOr;

/// Screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl From<(u16, u16)> for Point {
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}

/// Button drawing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ButtonState {
    Depressed = 0,
    Raised = 1,
}

/// Panel drawing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PanelState {
    Recessed = 0,
    Raised = 1,
}

/// Slider appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SliderMode {
    Indented = 0,
    Raised = 1,
    Hidden = 2,
}

/// Graphics parameters settable with `gfx_set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum GfxSetting {
    ObjectColour = 18,
    PageDisplay = 33,
    PageRead = 34,
    PageWrite = 35,
}

/// Graphics parameters readable with `gfx_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum GfxQuery {
    XMax = 0,
    YMax = 1,
    ObjectLeft = 2,
    ObjectTop = 3,
    ObjectRight = 4,
    ObjectBottom = 5,
}

/// Touch controller modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum TouchMode {
    Init = 0,
    Disable = 1,
    Reset = 2,
}

/// Touch controller queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum TouchQuery {
    Status = 0,
    X = 1,
    Y = 2,
}

/// Touch state reported by [`TouchQuery::Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchStatus {
    NoTouch,
    Press,
    Release,
    Moving,
}

impl TouchStatus {
    /// Converts a status word.
    pub fn from_word(value: u16) -> Result<Self> {
        match value {
            0 => Ok(TouchStatus::NoTouch),
            1 => Ok(TouchStatus::Press),
            2 => Ok(TouchStatus::Release),
            3 => Ok(TouchStatus::Moving),
            other => Err(Error::InvalidArgument(format!("touch status {}", other))),
        }
    }
}

/// Combined text attribute bits for `text_attributes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextAttributes(u16);

impl TextAttributes {
    pub const NONE: Self = Self(0);
    pub const BOLD: Self = Self(1 << 4);
    pub const ITALIC: Self = Self(1 << 5);
    pub const INVERSE: Self = Self(1 << 6);
    pub const UNDERLINED: Self = Self(1 << 7);

    const MASK: u16 = 0b1111 << 4;

    /// Keeps only the four attribute bits.
    pub fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TextAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
