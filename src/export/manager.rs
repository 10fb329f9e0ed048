use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, mpsc};

use crate::export::{
    dependencies::ExportDependencies,
    pipeline::{ExportRequest, perform_export},
    types::{ExportError, ExportOutcome, ExportStatus},
};

/// Shared state for managing async export operations.
///
/// Bridges the synchronous editor with background rendering and file I/O.
/// Requests are processed one at a time in submission order.
#[derive(Clone)]
pub struct ExportManager {
    /// Channel for sending export requests.
    request_tx: mpsc::UnboundedSender<ExportRequest>,
    /// Shared status of the current export operation.
    status: Arc<Mutex<ExportStatus>>,
    /// Shared result of the last export (if any).
    last_result: Arc<Mutex<Option<ExportOutcome>>>,
    /// Set once the owning session closes; aborts running and future exports.
    cancel: Arc<AtomicBool>,
}

impl ExportManager {
    /// Create a new export manager.
    ///
    /// This spawns a background task that processes export requests.
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        Self::with_dependencies(runtime_handle, ExportDependencies::default())
    }

    /// Create an export manager with custom dependencies (useful for testing).
    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: ExportDependencies,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ExportRequest>();
        let status = Arc::new(Mutex::new(ExportStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));
        let cancel = Arc::new(AtomicBool::new(false));
        let dependencies = Arc::new(dependencies);

        let status_clone = status.clone();
        let result_clone = last_result.clone();
        let cancel_clone = cancel.clone();
        let deps_clone = dependencies.clone();

        // Spawn background task to handle export requests
        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Processing export request: {:?}", request.destination);

                *status_clone.lock().await = ExportStatus::Rendering;

                match perform_export(request, deps_clone.clone(), cancel_clone.clone()).await {
                    Ok(result) => {
                        log::info!("Export successful: {:?}", result.saved_path);
                        *status_clone.lock().await = ExportStatus::Success;
                        *result_clone.lock().await = Some(ExportOutcome::Success(result));
                    }
                    Err(ExportError::Cancelled(reason)) => {
                        log::info!("Export cancelled: {}", reason);
                        *status_clone.lock().await = ExportStatus::Cancelled(reason.clone());
                        *result_clone.lock().await = Some(ExportOutcome::Cancelled(reason));
                    }
                    Err(e) => {
                        let error_message = e.to_string();
                        log::error!("Export failed: {}", error_message);
                        *status_clone.lock().await = ExportStatus::Failed(error_message.clone());
                        *result_clone.lock().await = Some(ExportOutcome::Failed(error_message));
                    }
                }
            }
        });

        Self {
            request_tx,
            status,
            last_result,
            cancel,
        }
    }

    /// Request an export.
    ///
    /// This is non-blocking and returns immediately. The export happens
    /// asynchronously in the background.
    pub fn request_export(&self, request: ExportRequest) -> Result<(), ExportError> {
        if self.is_cancelled() {
            return Err(ExportError::Cancelled("session closed".to_string()));
        }
        self.request_tx
            .send(request)
            .map_err(|_| ExportError::Task("Export manager not running".to_string()))?;
        Ok(())
    }

    /// Cancels the running export and refuses new ones.
    ///
    /// A partially written file is removed; the target path is left untouched.
    pub fn cancel(&self) {
        if !self.cancel.swap(true, Ordering::SeqCst) {
            log::info!("Cancelling exports");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Get the current export status.
    pub async fn get_status(&self) -> ExportStatus {
        self.status.lock().await.clone()
    }

    /// Get the result of the last export and clear it.
    pub async fn take_result(&self) -> Option<ExportOutcome> {
        self.last_result.lock().await.take()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<ExportOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Reset status to idle.
    pub async fn reset(&self) {
        *self.status.lock().await = ExportStatus::Idle;
    }
}

#[cfg(test)]
impl ExportManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<ExportRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(ExportStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}
