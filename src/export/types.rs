//! Data types for export.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::error::EngineError;

/// Quality used for JPEG exports (0-100).
pub const JPEG_QUALITY: u8 = 90;

/// Encoded output format.
///
/// PNG and WebP are lossless; JPEG is flattened onto white and encoded at
/// [`JPEG_QUALITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
}

impl ExportFormat {
    /// Primary file extension, without the dot.
    pub fn extension(self) -> &'static str {
        self.extensions()[0]
    }

    /// Every extension accepted for this format; the first is primary.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ExportFormat::Png => &["png"],
            ExportFormat::Jpeg => &["jpg", "jpeg"],
            ExportFormat::Webp => &["webp"],
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// Parses a format name or extension, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_start_matches('.').to_ascii_lowercase();
        [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Webp]
            .into_iter()
            .find(|format| format.extensions().contains(&name.as_str()))
    }
}

/// Where the exported image should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDestination {
    ClipboardOnly,
    FileOnly,
    ClipboardAndFile,
}

impl ExportDestination {
    pub fn wants_file(self) -> bool {
        matches!(
            self,
            ExportDestination::FileOnly | ExportDestination::ClipboardAndFile
        )
    }

    pub fn wants_clipboard(self) -> bool {
        matches!(
            self,
            ExportDestination::ClipboardOnly | ExportDestination::ClipboardAndFile
        )
    }
}

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Path the file was written to (if a file was requested).
    pub saved_path: Option<PathBuf>,
    /// Whether the image reached the clipboard.
    pub copied_to_clipboard: bool,
    pub width: i32,
    pub height: i32,
    /// Size of the encoded image in bytes.
    pub encoded_len: usize,
}

/// Outcome of an export request.
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    Success(ExportResult),
    Failed(String),
    Cancelled(String),
}

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to render export: {0}")]
    Render(#[from] EngineError),

    #[error("Failed to encode export: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to save export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard operation failed: {0}")]
    Clipboard(String),

    #[error("Export cancelled: {0}")]
    Cancelled(String),

    #[error("Export task failed: {0}")]
    Task(String),
}

/// Status of the export manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    /// Rendering and encoding the full-size image.
    Rendering,
    /// Writing the file and/or clipboard.
    Delivering,
    Success,
    Failed(String),
    Cancelled(String),
}
