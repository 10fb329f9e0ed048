use std::{path::PathBuf, sync::Arc, sync::atomic::AtomicBool};

use crate::export::{
    file::{self, SaveLocation},
    types::{ExportError, ExportFormat},
};

/// Abstraction over file saving for exports.
pub trait ExportFileSaver: Send + Sync {
    fn save(
        &self,
        image_data: &[u8],
        location: &SaveLocation,
        format: ExportFormat,
        cancel: &AtomicBool,
    ) -> Result<PathBuf, ExportError>;
}

/// Abstraction over copying exports to the clipboard.
///
/// The clipboard protocol belongs to the UI layer, which supplies an implementation.
pub trait ExportClipboard: Send + Sync {
    fn copy(&self, image_data: &[u8], format: ExportFormat) -> Result<(), ExportError>;
}

/// Bundle of dependencies used by the export pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct ExportDependencies {
    pub saver: Arc<dyn ExportFileSaver>,
    pub clipboard: Arc<dyn ExportClipboard>,
}

impl Default for ExportDependencies {
    fn default() -> Self {
        Self {
            saver: Arc::new(DefaultFileSaver),
            clipboard: Arc::new(UnavailableClipboard),
        }
    }
}

impl ExportDependencies {
    /// Default file saving with a front-end supplied clipboard.
    pub fn with_clipboard(clipboard: Arc<dyn ExportClipboard>) -> Self {
        Self {
            clipboard,
            ..Self::default()
        }
    }
}

struct DefaultFileSaver;
struct UnavailableClipboard;

impl ExportFileSaver for DefaultFileSaver {
    fn save(
        &self,
        image_data: &[u8],
        location: &SaveLocation,
        format: ExportFormat,
        cancel: &AtomicBool,
    ) -> Result<PathBuf, ExportError> {
        file::save_export(image_data, location, format, cancel)
    }
}

impl ExportClipboard for UnavailableClipboard {
    fn copy(&self, _image_data: &[u8], _format: ExportFormat) -> Result<(), ExportError> {
        Err(ExportError::Clipboard(
            "no clipboard provider configured".to_string(),
        ))
    }
}
