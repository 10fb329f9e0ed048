use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::{Mutex, mpsc};
use tokio::task;

use super::{RenderSnapshot, RenderTarget, Renderer};
use crate::draw::Raster;

struct RenderRequest {
    generation: u64,
    snapshot: RenderSnapshot,
    target: RenderTarget,
}

/// Result of a background render.
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered { generation: u64, raster: Raster },
    Failed { generation: u64, message: String },
}

impl RenderOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            RenderOutcome::Rendered { generation, .. } | RenderOutcome::Failed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Renders snapshots off the event thread.
///
/// Only the most recent request matters: queued requests that have been
/// superseded are skipped, and results that finish after a newer request was
/// submitted are discarded.
#[derive(Clone)]
pub struct RenderWorker {
    /// Channel for sending render requests.
    request_tx: mpsc::UnboundedSender<RenderRequest>,
    /// Generation of the newest submitted request.
    latest: Arc<AtomicU64>,
    /// Newest completed, non-stale render (if any).
    last_result: Arc<Mutex<Option<RenderOutcome>>>,
}

impl RenderWorker {
    /// Creates a worker whose loop runs on `runtime_handle`.
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<RenderRequest>();
        let latest = Arc::new(AtomicU64::new(0));
        let last_result = Arc::new(Mutex::new(None));

        let latest_clone = latest.clone();
        let result_clone = last_result.clone();

        runtime_handle.spawn(async move {
            let mut renderer = Renderer::new();
            while let Some(mut request) = request_rx.recv().await {
                // Skip anything already superseded in the queue.
                while let Ok(newer) = request_rx.try_recv() {
                    log::debug!("Skipping queued render {}", request.generation);
                    request = newer;
                }

                let generation = request.generation;
                let joined = task::spawn_blocking(move || {
                    let result = renderer.render_target(&request.snapshot, request.target);
                    (renderer, result)
                })
                .await;

                let (returned, result) = match joined {
                    Ok(pair) => pair,
                    Err(e) => {
                        log::error!("Render task failed: {}", e);
                        renderer = Renderer::new();
                        *result_clone.lock().await = Some(RenderOutcome::Failed {
                            generation,
                            message: e.to_string(),
                        });
                        continue;
                    }
                };
                renderer = returned;

                if generation != latest_clone.load(Ordering::SeqCst) {
                    log::debug!("Discarding superseded render {}", generation);
                    continue;
                }

                let outcome = match result {
                    Ok(raster) => {
                        log::debug!(
                            "Render {} finished at {}x{}",
                            generation,
                            raster.width(),
                            raster.height()
                        );
                        RenderOutcome::Rendered { generation, raster }
                    }
                    Err(e) => {
                        log::error!("Render {} failed: {}", generation, e);
                        RenderOutcome::Failed {
                            generation,
                            message: e.to_string(),
                        }
                    }
                };
                *result_clone.lock().await = Some(outcome);
            }
        });

        Self {
            request_tx,
            latest,
            last_result,
        }
    }

    /// Queues a render and returns its generation number.
    ///
    /// Returns `None` when the worker loop is no longer running.
    pub fn submit(&self, snapshot: RenderSnapshot, target: RenderTarget) -> Option<u64> {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let request = RenderRequest {
            generation,
            snapshot,
            target,
        };
        match self.request_tx.send(request) {
            Ok(()) => Some(generation),
            Err(_) => {
                log::error!("Render worker not running");
                None
            }
        }
    }

    /// Generation of the newest submitted request.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Get the newest result and clear it.
    pub async fn take_result(&self) -> Option<RenderOutcome> {
        self.last_result.lock().await.take()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<RenderOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }
}
