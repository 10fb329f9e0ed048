//! Export of the composed image to files and the clipboard.
//!
//! Exports run on a background task against a [`RenderSnapshot`] taken at
//! request time, so the editor keeps accepting input while the full-size
//! render is encoded and written:
//! - PNG, JPEG or WebP encoding of the full-resolution canvas
//! - File saving with templated names and atomic replacement
//! - Clipboard delivery through an injected provider
//!
//! [`RenderSnapshot`]: crate::render::RenderSnapshot

pub mod dependencies;
pub mod encode;
pub mod file;
pub mod types;

mod manager;
mod pipeline;

pub use dependencies::{ExportClipboard, ExportDependencies, ExportFileSaver};
pub use file::{FileSaveConfig, SaveLocation};
pub use manager::ExportManager;
pub use pipeline::{ExportRequest, perform_export};
pub use types::{
    ExportDestination, ExportError, ExportFormat, ExportOutcome, ExportResult, ExportStatus,
    JPEG_QUALITY,
};
