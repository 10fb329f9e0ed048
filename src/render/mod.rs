//! Composite rendering shared by the display and export paths.
//!
//! A [`RenderSnapshot`] captures everything needed to paint the scene at one
//! moment, so renders can run off the event thread. The [`Renderer`] turns a
//! snapshot into pixels at any target size using the same routine for
//! on-screen preview and full-resolution export.

pub mod worker;


pub use worker::{RenderOutcome, RenderWorker};

use crate::draw::{
    Background, FrameConfig, FramedImage, Raster, Shape, compose_frame, pixelate_region,
    render_shape,
};
use crate::error::{EngineError, Result};
use crate::scene::Scene;
use crate::util::{Point, Rect};
use cairo::{Filter, SurfacePattern};
use std::sync::Arc;

/// Immutable copy of the scene state needed to render one frame.
#[derive(Clone, Debug)]
pub struct RenderSnapshot {
    pub background: Background,
    pub frame: FrameConfig,
    /// Shapes in paint order, including any in-progress preview on top.
    pub shapes: Arc<[Shape]>,
    pub subject: Option<Arc<Raster>>,
    /// When false only background and framed subject are painted.
    pub annotations_visible: bool,
}

impl RenderSnapshot {
    /// Captures `scene`; `preview` is painted above every committed annotation.
    pub fn capture(scene: &Scene, subject: Option<Arc<Raster>>, preview: Option<&Shape>) -> Self {
        let shapes: Vec<Shape> = scene
            .annotations()
            .iter()
            .map(|annotation| annotation.shape.clone())
            .chain(preview.cloned())
            .collect();
        Self {
            background: scene.background().clone(),
            frame: *scene.frame_config(),
            shapes: shapes.into(),
            subject,
            annotations_visible: true,
        }
    }

    /// Shows or hides the whole annotation layer, preview included.
    pub fn with_annotations_visible(mut self, visible: bool) -> Self {
        self.annotations_visible = visible;
        self
    }

    fn subject(&self) -> Result<&Arc<Raster>> {
        self.subject.as_ref().ok_or(EngineError::RenderSourceMissing)
    }

    /// Full-resolution canvas size: subject plus padding and aspect fitting.
    pub fn canvas_size(&self) -> Result<(i32, i32)> {
        let (width, height) = self.subject()?.size();
        Ok(self.frame.canvas_size(width, height))
    }
}

/// Output size requested from a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// Full-resolution canvas, as exported.
    Canvas,
    /// Scaled down to fit a viewport, preserving aspect ratio.
    Fit { max_width: i32, max_height: i32 },
}

impl RenderTarget {
    /// Pixel size this target resolves to for `snapshot`.
    pub fn resolve(&self, snapshot: &RenderSnapshot) -> Result<(i32, i32)> {
        let canvas = snapshot.canvas_size()?;
        Ok(match *self {
            RenderTarget::Canvas => canvas,
            RenderTarget::Fit {
                max_width,
                max_height,
            } => fit_within(canvas, max_width, max_height),
        })
    }
}

/// Largest size with the aspect ratio of `size` that fits in `max_width` x `max_height`.
///
/// Never upscales; each side is at least one pixel.
pub fn fit_within(size: (i32, i32), max_width: i32, max_height: i32) -> (i32, i32) {
    let (width, height) = size;
    if width <= 0 || height <= 0 {
        return (width.max(1), height.max(1));
    }
    let scale = (max_width as f64 / width as f64)
        .min(max_height as f64 / height as f64)
        .min(1.0);
    if scale >= 1.0 {
        return size;
    }
    (
        ((width as f64 * scale).round() as i32).max(1),
        ((height as f64 * scale).round() as i32).max(1),
    )
}

struct BackgroundCache {
    background: Background,
    size: (i32, i32),
    raster: Arc<Raster>,
}

struct FrameCache {
    config: FrameConfig,
    subject: Arc<Raster>,
    framed: Arc<FramedImage>,
}

/// Renders snapshots, caching the background and framed subject between calls.
///
/// Annotation edits only repaint the vector layer; the cached rasters are
/// rebuilt when the background, frame settings, subject or size change.
#[derive(Default)]
pub struct Renderer {
    background_cache: Option<BackgroundCache>,
    frame_cache: Option<FrameCache>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders at the full canvas size, as used for export.
    pub fn render_full(&mut self, snapshot: &RenderSnapshot) -> Result<Raster> {
        self.render_target(snapshot, RenderTarget::Canvas)
    }

    pub fn render_target(&mut self, snapshot: &RenderSnapshot, target: RenderTarget) -> Result<Raster> {
        let size = target.resolve(snapshot)?;
        self.render(snapshot, size)
    }

    /// Renders `snapshot` scaled to `target` (width, height).
    pub fn render(&mut self, snapshot: &RenderSnapshot, target: (i32, i32)) -> Result<Raster> {
        let subject = snapshot.subject()?.clone();
        let (target_w, target_h) = target;
        crate::draw::raster::check_dimensions(target_w, target_h)?;

        let framed = self.framed(&subject, &snapshot.frame)?;
        let (canvas_w, canvas_h) = framed.raster.size();
        let scale_x = target_w as f64 / canvas_w as f64;
        let scale_y = target_h as f64 / canvas_h as f64;

        let mut canvas = (*self.background(&snapshot.background, target)?).clone();

        if target == (canvas_w, canvas_h) {
            canvas.composite_over(&framed.raster, 0, 0);
        } else {
            let surface = framed.raster.to_surface()?;
            canvas.paint_with(|ctx| {
                ctx.scale(scale_x, scale_y);
                let pattern = SurfacePattern::create(&surface);
                pattern.set_filter(Filter::Good);
                if ctx.set_source(&pattern).is_ok() {
                    let _ = ctx.paint();
                }
            })?;
        }

        if snapshot.annotations_visible {
            paint_shapes(
                &mut canvas,
                &snapshot.shapes,
                framed.origin,
                (scale_x, scale_y),
            )?;
        }
        Ok(canvas)
    }

    fn background(&mut self, background: &Background, size: (i32, i32)) -> Result<Arc<Raster>> {
        if let Some(cache) = &self.background_cache {
            if cache.size == size && cache.background == *background {
                return Ok(cache.raster.clone());
            }
        }
        log::debug!("Generating background at {}x{}", size.0, size.1);
        let raster = Arc::new(background.generate(size.0, size.1)?);
        self.background_cache = Some(BackgroundCache {
            background: background.clone(),
            size,
            raster: raster.clone(),
        });
        Ok(raster)
    }

    fn framed(&mut self, subject: &Arc<Raster>, config: &FrameConfig) -> Result<Arc<FramedImage>> {
        if let Some(cache) = &self.frame_cache {
            if cache.config == *config && Arc::ptr_eq(&cache.subject, subject) {
                return Ok(cache.framed.clone());
            }
        }
        log::debug!("Composing frame for {}x{} subject", subject.width(), subject.height());
        let framed = Arc::new(compose_frame(subject, config, None)?);
        self.frame_cache = Some(FrameCache {
            config: *config,
            subject: subject.clone(),
            framed: framed.clone(),
        });
        Ok(framed)
    }

    /// Drops cached rasters, e.g. after the subject image was replaced.
    pub fn clear_cache(&mut self) {
        self.background_cache = None;
        self.frame_cache = None;
    }
}

/// Paints shapes in order; censor boxes pixelate whatever is already on the canvas.
fn paint_shapes(
    canvas: &mut Raster,
    shapes: &[Shape],
    origin: Point,
    scale: (f64, f64),
) -> Result<()> {
    let (scale_x, scale_y) = scale;
    for run in shapes.split_inclusive(|shape| matches!(shape, Shape::Censor { .. })) {
        let (vector, censor) = match run.split_last() {
            Some((Shape::Censor { bounds, strength }, rest)) => (rest, Some((bounds, *strength))),
            _ => (run, None),
        };

        if !vector.is_empty() {
            canvas.paint_with(|ctx| {
                ctx.scale(scale_x, scale_y);
                ctx.translate(origin.x, origin.y);
                for shape in vector {
                    render_shape(ctx, shape);
                }
            })?;
        }

        if let Some((bounds, strength)) = censor {
            let region = Rect::new(
                (bounds.x + origin.x) * scale_x,
                (bounds.y + origin.y) * scale_y,
                bounds.width * scale_x,
                bounds.height * scale_y,
            );
            pixelate_region(canvas, &region, strength * scale_x.min(scale_y));
        }
    }
    Ok(())
}
