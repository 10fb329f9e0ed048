//! Engine-level error type.

use crate::scene::AnnotationId;
use thiserror::Error;

/// Errors raised by the composition engine and the scene model.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A raster was requested with a non-positive width or height.
    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// An operation referenced an annotation id that is not in the scene.
    ///
    /// This indicates the caller and the scene have drifted apart; the editor
    /// session treats it as fatal for further edits.
    #[error("annotation {0} does not exist in the scene")]
    UnknownAnnotationId(AnnotationId),

    /// A command tried to insert an id that is already present.
    #[error("annotation {0} is already part of the scene")]
    DuplicateAnnotationId(AnnotationId),

    /// A render or export was requested before a subject image was loaded.
    #[error("no subject image loaded")]
    RenderSourceMissing,

    /// The session refused an edit after an earlier consistency fault.
    #[error("editor session is faulted and no longer accepts edits")]
    SessionFaulted,

    /// The session was closed; edits and exports are no longer accepted.
    #[error("editor session is closed")]
    SessionClosed,

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface pixels unavailable: {0}")]
    SurfaceBorrow(#[from] cairo::BorrowError),

    #[error("PNG codec error: {0}")]
    Png(#[from] cairo::IoError),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, EngineError>;
