//! Where subject images come from.
//!
//! Front-ends hand the session a decoded [`Raster`]; how they obtained it
//! (screenshot portal, file, clipboard) stays behind [`ImageSource`].

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;

use crate::draw::Raster;
use crate::error::{EngineError, Result};

/// Abstraction over how a subject image is obtained.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load(&self) -> Result<Raster>;
}

/// Reads a PNG file from disk.
#[derive(Debug, Clone)]
pub struct PngFileSource {
    path: PathBuf,
}

impl PngFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for PngFileSource {
    async fn load(&self) -> Result<Raster> {
        let path = self.path.clone();
        log::info!("Loading subject image from {}", path.display());
        task::spawn_blocking(move || -> Result<Raster> {
            let bytes = std::fs::read(&path)?;
            let raster = Raster::decode_png(&bytes)?;
            log::debug!(
                "Decoded {} ({}x{})",
                path.display(),
                raster.width(),
                raster.height()
            );
            Ok(raster)
        })
        .await
        .map_err(|e| EngineError::Io(std::io::Error::other(e)))?
    }
}

/// Serves an already decoded raster, e.g. one handed over by a capture backend.
#[derive(Debug, Clone)]
pub struct RasterSource {
    raster: Arc<Raster>,
}

impl RasterSource {
    pub fn new(raster: Raster) -> Self {
        Self {
            raster: Arc::new(raster),
        }
    }
}

#[async_trait]
impl ImageSource for RasterSource {
    async fn load(&self) -> Result<Raster> {
        Ok((*self.raster).clone())
    }
}
