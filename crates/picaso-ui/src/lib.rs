//! Widget layer for PICASO displays.
//!
//! A small retained-mode tree of canvases, grids and buttons that lays
//! itself out and repaints only what changed.

pub mod envelope;
pub mod error;
pub mod layout;
pub mod surface;
pub mod widget;

#[cfg(test)]
pub(crate) mod recording;

pub use envelope::Envelope;
pub use error::{Error, Result};
pub use layout::Orientation;
pub use surface::Surface;
pub use widget::{ButtonConfig, CanvasConfig, Widget, WidgetKind};
