//! Error types for the widget layer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or drawing a widget tree.
#[derive(Error, Debug)]
pub enum Error {
    /// A single-orientation widget already has its child.
    #[error("Cannot add more than one child to a non-grid widget")]
    TooManyChildren,

    /// A display command failed during layout or paint.
    #[error("Display error: {0}")]
    Device(#[from] picaso_hw::Error),
}
