//! One editing session: subject image, scene, tool state and export.
//!
//! [`EditorSession`] is the single owner of the [`Document`]. Front-ends feed
//! it pointer and keyboard events already mapped to image space, ask it for
//! display renders, and close it when the window goes away. Closing cancels
//! any running export.
//!
//! An [`EngineError::UnknownAnnotationId`] from an edit means the state
//! machine and the scene disagree; the session then marks itself faulted and
//! refuses further edits while rendering and export keep working.

use std::sync::Arc;

use crate::config::Config;
use crate::draw::{Background, FrameConfig, Raster};
use crate::error::{EngineError, Result};
use crate::export::{
    ExportDestination, ExportError, ExportFormat, ExportManager, ExportRequest, SaveLocation,
};
use crate::input::{DrawingState, InputState, Key, MouseButton, Tool, ToolStyle, ViewTransform};
use crate::render::{RenderSnapshot, RenderTarget, Renderer};
use crate::scene::{AnnotationId, Document, Scene};
use crate::source::ImageSource;
use crate::util::Point;

/// Editing session for one screenshot.
pub struct EditorSession {
    subject: Option<Arc<Raster>>,
    document: Document,
    input: InputState,
    renderer: Renderer,
    exports: Option<ExportManager>,
    export_format: ExportFormat,
    annotations_visible: bool,
    faulted: bool,
    closed: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(
            ToolStyle::default(),
            Background::default(),
            FrameConfig::default(),
        )
    }
}

impl EditorSession {
    pub fn new(style: ToolStyle, background: Background, frame: FrameConfig) -> Self {
        Self {
            subject: None,
            document: Document::new(background, frame),
            input: InputState::new(style),
            renderer: Renderer::new(),
            exports: None,
            export_format: ExportFormat::default(),
            annotations_visible: true,
            faulted: false,
            closed: false,
        }
    }

    /// Session initialized from the user's style, frame, background and export settings.
    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new(
            config.tool_style(),
            config.background(),
            config.frame_config(),
        );
        session.export_format = config.export_format();
        session
    }

    /// Routes [`EditorSession::request_export`] through `manager`.
    pub fn with_export_manager(mut self, manager: ExportManager) -> Self {
        self.exports = Some(manager);
        self
    }

    /// Replaces the subject image and starts a fresh scene for it.
    ///
    /// Annotations, selection and undo history belong to the previous image
    /// and are discarded, which also lifts a fault. Background, frame
    /// settings, tool and style carry over.
    pub fn load_subject(&mut self, raster: Raster) {
        log::info!(
            "Loaded subject {}x{}",
            raster.width(),
            raster.height()
        );
        let scene = self.document.scene();
        self.document = Document::new(scene.background().clone(), *scene.frame_config());
        self.input.state = DrawingState::Idle;
        self.faulted = false;
        self.subject = Some(Arc::new(raster));
        self.renderer.clear_cache();
        self.input.needs_redraw = true;
    }

    /// Loads the subject from `source`.
    pub async fn load_from(&mut self, source: &dyn ImageSource) -> Result<()> {
        let raster = source.load().await?;
        self.load_subject(raster);
        Ok(())
    }

    pub fn subject(&self) -> Option<&Arc<Raster>> {
        self.subject.as_ref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn scene(&self) -> &Scene {
        self.document.scene()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn style_mut(&mut self) -> &mut ToolStyle {
        &mut self.input.style
    }

    pub fn set_view(&mut self, view: ViewTransform) {
        self.input.view = view;
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns and clears the redraw flag.
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::take(&mut self.input.needs_redraw)
    }

    /// Runs an edit unless the session is closed or faulted, recording desync faults.
    fn edit<T>(
        &mut self,
        op: impl FnOnce(&mut InputState, &mut Document) -> Result<T>,
    ) -> Result<T> {
        if self.closed {
            return Err(EngineError::SessionClosed);
        }
        if self.faulted {
            return Err(EngineError::SessionFaulted);
        }
        let result = op(&mut self.input, &mut self.document);
        if let Err(EngineError::UnknownAnnotationId(id)) = &result {
            log::error!("Scene out of sync at annotation {}; refusing further edits", id);
            self.faulted = true;
        }
        result
    }

    pub fn set_tool(&mut self, tool: Tool) -> Result<()> {
        self.edit(|input, document| input.set_tool(document, tool))
    }

    pub fn pointer_press(&mut self, button: MouseButton, point: Point) -> Result<()> {
        self.edit(|input, document| input.on_mouse_press(document, button, point))
    }

    pub fn pointer_motion(&mut self, point: Point) -> Result<()> {
        self.edit(|input, document| input.on_mouse_motion(document, point))
    }

    pub fn pointer_release(&mut self, button: MouseButton, point: Point) -> Result<()> {
        self.edit(|input, document| input.on_mouse_release(document, button, point))
    }

    pub fn key_press(&mut self, key: Key) -> Result<()> {
        self.edit(|input, document| input.on_key_press(document, key))
    }

    pub fn key_release(&mut self, key: Key) {
        self.input.on_key_release(key);
    }

    pub fn undo(&mut self) -> Result<()> {
        self.edit(|input, document| input.undo(document))
    }

    pub fn redo(&mut self) -> Result<()> {
        self.edit(|input, document| input.redo(document))
    }

    /// Selects `id` (or clears with `None`) and moves the state machine along.
    pub fn select(&mut self, id: Option<AnnotationId>) -> Result<()> {
        self.edit(|input, document| {
            input.settle(document)?;
            document.select(id)?;
            input.sync_with_selection(document);
            Ok(())
        })
    }

    /// Moves annotation `id` to paint position `index`.
    pub fn reorder(&mut self, id: AnnotationId, index: usize) -> Result<()> {
        self.edit(|input, document| {
            document.reorder(id, index)?;
            input.needs_redraw = true;
            Ok(())
        })
    }

    /// Removes every annotation in one undoable step.
    pub fn clear_annotations(&mut self) -> Result<()> {
        self.edit(|input, document| {
            input.settle(document)?;
            if document.clear_annotations()? {
                log::debug!("Cleared all annotations");
            }
            input.sync_with_selection(document);
            Ok(())
        })
    }

    /// Shows or hides the annotation layer in display renders and exports.
    ///
    /// View state only; not recorded in the undo history.
    pub fn set_annotations_visible(&mut self, visible: bool) {
        if self.annotations_visible != visible {
            self.annotations_visible = visible;
            self.input.needs_redraw = true;
        }
    }

    pub fn annotations_visible(&self) -> bool {
        self.annotations_visible
    }

    /// Format used by [`EditorSession::request_export`].
    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export_format = format;
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    pub fn set_background(&mut self, background: Background) -> Result<()> {
        self.edit(|input, document| {
            document.set_background(background)?;
            input.needs_redraw = true;
            Ok(())
        })
    }

    pub fn set_frame_config(&mut self, frame: FrameConfig) -> Result<()> {
        self.edit(|input, document| {
            document.set_frame_config(frame)?;
            input.needs_redraw = true;
            Ok(())
        })
    }

    /// Snapshot for display, including the shape currently being drawn.
    pub fn display_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(
            self.document.scene(),
            self.subject.clone(),
            self.input.in_progress_shape(),
        )
        .with_annotations_visible(self.annotations_visible)
    }

    /// Snapshot of the committed scene, as exported.
    pub fn export_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self.document.scene(), self.subject.clone(), None)
            .with_annotations_visible(self.annotations_visible)
    }

    /// Full canvas size for the current subject and frame.
    pub fn canvas_size(&self) -> Result<(i32, i32)> {
        self.export_snapshot().canvas_size()
    }

    /// Renders the display view scaled to fit `max_width` x `max_height`.
    pub fn render_display(&mut self, max_width: i32, max_height: i32) -> Result<Raster> {
        let snapshot = self.display_snapshot();
        self.renderer.render_target(
            &snapshot,
            RenderTarget::Fit {
                max_width,
                max_height,
            },
        )
    }

    /// Renders the full-resolution export synchronously.
    pub fn export_raster(&mut self) -> Result<Raster> {
        if self.closed {
            return Err(EngineError::SessionClosed);
        }
        let snapshot = self.export_snapshot();
        self.renderer.render_full(&snapshot)
    }

    /// Queues a background export through the attached [`ExportManager`].
    pub fn request_export(
        &self,
        destination: ExportDestination,
        location: Option<SaveLocation>,
    ) -> std::result::Result<(), ExportError> {
        if self.closed {
            return Err(ExportError::Cancelled("session closed".to_string()));
        }
        let manager = self
            .exports
            .as_ref()
            .ok_or_else(|| ExportError::Task("no export manager attached".to_string()))?;
        if self.subject.is_none() {
            return Err(ExportError::Render(EngineError::RenderSourceMissing));
        }
        manager.request_export(ExportRequest {
            snapshot: self.export_snapshot(),
            format: self.export_format,
            destination,
            location,
        })
    }

    /// Ends the session and cancels any running export.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(manager) = &self.exports {
            manager.cancel();
        }
        log::info!("Editor session closed");
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests;
