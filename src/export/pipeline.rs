use std::{
    fmt,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::task;

use crate::export::{
    dependencies::{ExportClipboard, ExportDependencies, ExportFileSaver},
    encode::encode,
    file::SaveLocation,
    types::{ExportDestination, ExportError, ExportFormat, ExportResult},
};
use crate::render::{RenderSnapshot, Renderer};

/// One export job: what to render and where it goes.
#[derive(Clone)]
pub struct ExportRequest {
    pub snapshot: RenderSnapshot,
    pub format: ExportFormat,
    pub destination: ExportDestination,
    /// Required when `destination` includes a file.
    pub location: Option<SaveLocation>,
}

impl fmt::Debug for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportRequest")
            .field("format", &self.format)
            .field("destination", &self.destination)
            .field("location", &self.location)
            .field("shapes", &self.snapshot.shapes.len())
            .finish()
    }
}

fn check_cancel(cancel: &AtomicBool) -> Result<(), ExportError> {
    if cancel.load(Ordering::SeqCst) {
        Err(ExportError::Cancelled("session closed".to_string()))
    } else {
        Ok(())
    }
}

/// Renders, encodes and delivers one export.
///
/// `cancel` is polled between stages and during the file write.
pub async fn perform_export(
    request: ExportRequest,
    dependencies: Arc<ExportDependencies>,
    cancel: Arc<AtomicBool>,
) -> Result<ExportResult, ExportError> {
    log::info!("Starting export: {:?}", request);
    check_cancel(&cancel)?;

    let snapshot = request.snapshot.clone();
    let format = request.format;
    let (image_data, width, height) = task::spawn_blocking(move || {
        let raster = Renderer::new().render_full(&snapshot)?;
        let bytes = encode(&raster, format)?;
        Ok::<_, ExportError>((bytes, raster.width(), raster.height()))
    })
    .await
    .map_err(|e| ExportError::Task(format!("Render task failed: {}", e)))??;

    log::debug!(
        "Encoded {}x{} export ({} bytes)",
        width,
        height,
        image_data.len()
    );
    check_cancel(&cancel)?;

    let image_data = Arc::new(image_data);
    let saved_path = if request.destination.wants_file() {
        let location = request.location.clone().ok_or_else(|| {
            ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file export requested without a save location",
            ))
        })?;
        Some(
            save_image(
                Arc::clone(&dependencies.saver),
                Arc::clone(&image_data),
                location,
                format,
                Arc::clone(&cancel),
            )
            .await?,
        )
    } else {
        None
    };

    let copied_to_clipboard = if request.destination.wants_clipboard() {
        check_cancel(&cancel)?;
        log::info!("Attempting to copy {} bytes to clipboard", image_data.len());
        copy_to_clipboard(
            Arc::clone(&dependencies.clipboard),
            Arc::clone(&image_data),
            format,
        )
        .await
    } else {
        log::debug!("Clipboard copy not requested for this export");
        false
    };

    Ok(ExportResult {
        saved_path,
        copied_to_clipboard,
        width,
        height,
        encoded_len: image_data.len(),
    })
}

async fn save_image(
    saver: Arc<dyn ExportFileSaver>,
    image_data: Arc<Vec<u8>>,
    location: SaveLocation,
    format: ExportFormat,
    cancel: Arc<AtomicBool>,
) -> Result<PathBuf, ExportError> {
    task::spawn_blocking(move || saver.save(&image_data, &location, format, &cancel))
        .await
        .map_err(|e| ExportError::Task(format!("Save task failed: {}", e)))?
}

async fn copy_to_clipboard(
    clipboard: Arc<dyn ExportClipboard>,
    image_data: Arc<Vec<u8>>,
    format: ExportFormat,
) -> bool {
    match task::spawn_blocking(move || clipboard.copy(&image_data, format))
        .await
        .map_err(|e| ExportError::Clipboard(format!("Clipboard task failed: {}", e)))
    {
        Ok(Ok(())) => {
            log::info!("Successfully copied to clipboard");
            true
        }
        Ok(Err(e)) | Err(e) => {
            log::error!("Failed to copy to clipboard: {}", e);
            false
        }
    }
}
