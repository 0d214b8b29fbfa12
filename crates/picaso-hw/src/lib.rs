//! PICASO Display Serial Library
//!
//! Host-side driver for 4D Systems PICASO-based serial display modules
//! (uLCD-43 and relatives). Commands are encoded into the module's binary
//! protocol and exchanged over a synchronous ACK/ERR serial link.

pub mod baud;
pub mod channel;
pub mod colour;
pub mod display;
pub mod error;
pub mod link;
pub mod protocol;
pub mod screen_mode;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use baud::{BaudNegotiator, NegotiatorState};
pub use channel::{NativeChannel, SerialChannel};
pub use colour::Colour;
pub use display::Display;
pub use error::{Error, Result};
pub use link::{Link, LinkState};
pub use protocol::{Frame, Opcode, Response, ResponseShape};
pub use screen_mode::ScreenMode;
pub use types::{
    ButtonState, GfxQuery, GfxSetting, PanelState, Point, SliderMode, TextAttributes, TouchMode,
    TouchQuery, TouchStatus,
};

/// Display dimensions in landscape mode.
pub const DISPLAY_WIDTH: u16 = 480;
pub const DISPLAY_HEIGHT: u16 = 272;
