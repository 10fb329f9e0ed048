use crate::draw::Shape;
use crate::error::Result;
use crate::input::{events::MouseButton, tool::Tool};
use crate::scene::hit::shape_contains;
use crate::scene::{Document, HANDLE_TOLERANCE_PX, STROKE_HIT_SLACK, handle_test, hit_test};
use crate::util::Point;

use super::{DragKind, DrawingState, InputState};

impl InputState {
    /// Processes a pointer press at an image-space `point`.
    ///
    /// # Behavior
    /// - Left press with a creation tool starts a drawing (Number inserts at once)
    /// - Left press with Select grabs a handle, moves an annotation, or clears the selection
    /// - Right press cancels an in-progress drawing or drag
    pub fn on_mouse_press(
        &mut self,
        document: &mut Document,
        button: MouseButton,
        point: Point,
    ) -> Result<()> {
        match button {
            MouseButton::Left => {}
            MouseButton::Right => return self.cancel_gesture(document),
            MouseButton::Middle => return Ok(()),
        }

        match &self.state {
            DrawingState::Drawing { .. } | DrawingState::Dragging { .. } => return Ok(()),
            DrawingState::EditingText { .. } => self.settle(document)?,
            DrawingState::Idle | DrawingState::Selected { .. } => {}
        }

        match self.tool {
            Tool::Select => self.press_select(document, point),
            Tool::Number => {
                let shape = Shape::NumberMarker {
                    center: point,
                    index: document.scene().next_marker_index(),
                    color: self.style.color,
                    radius: self.style.number_radius,
                };
                let id = document.insert(shape)?;
                document.select(Some(id))?;
                log::debug!("Placed number marker {}", id);
                self.state = DrawingState::Selected { id };
                self.needs_redraw = true;
                Ok(())
            }
            tool => {
                if document.scene().selection().is_some() {
                    document.select(None)?;
                }
                if let Some(shape) = self.begin_shape(tool, point) {
                    self.state = DrawingState::Drawing {
                        tool,
                        origin: point,
                        shape,
                    };
                }
                self.needs_redraw = true;
                Ok(())
            }
        }
    }

    fn press_select(&mut self, document: &mut Document, point: Point) -> Result<()> {
        let tolerance = self.view.image_distance(HANDLE_TOLERANCE_PX);

        // The selected annotation wins over anything painted above it.
        if let Some(selected) = document
            .scene()
            .selection()
            .and_then(|id| document.scene().get(id))
        {
            let kind = handle_test(selected, point, tolerance).map(DragKind::Resize).or_else(|| {
                shape_contains(&selected.shape, point, STROKE_HIT_SLACK).then_some(DragKind::Move)
            });
            if let Some(kind) = kind {
                self.state = DrawingState::Dragging {
                    id: selected.id,
                    kind,
                    origin: point,
                    original: selected.shape.clone(),
                };
                self.needs_redraw = true;
                return Ok(());
            }
        }

        match hit_test(document.scene(), point) {
            Some(id) => {
                document.select(Some(id))?;
                let original = document.scene().require(id)?.shape.clone();
                log::debug!("Selected {}", id);
                self.state = DrawingState::Dragging {
                    id,
                    kind: DragKind::Move,
                    origin: point,
                    original,
                };
            }
            None => {
                document.select(None)?;
                self.state = DrawingState::Idle;
            }
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Processes pointer motion to an image-space `point`.
    ///
    /// Drawings update their geometry; drags preview the moved or resized
    /// annotation without recording history.
    pub fn on_mouse_motion(&mut self, document: &mut Document, point: Point) -> Result<()> {
        let mut state = std::mem::replace(&mut self.state, DrawingState::Idle);
        let result = match &mut state {
            DrawingState::Drawing { origin, shape, .. } => {
                self.extend_shape(shape, *origin, point);
                self.needs_redraw = true;
                Ok(())
            }
            DrawingState::Dragging {
                id,
                kind,
                origin,
                original,
            } => {
                let shape = match kind {
                    DragKind::Move => {
                        let mut moved = original.clone();
                        moved.translate(point.x - origin.x, point.y - origin.y);
                        moved
                    }
                    DragKind::Resize(handle) => original.resized(*handle, point),
                };
                self.needs_redraw = true;
                document.preview_update(*id, shape)
            }
            _ => Ok(()),
        };
        self.state = state;
        result
    }

    /// Processes a pointer release at an image-space `point`.
    ///
    /// # Behavior
    /// - Drawing: finalizes the shape and inserts it, or discards it when empty
    /// - Dragging: commits the whole drag as one change and keeps the selection
    pub fn on_mouse_release(
        &mut self,
        document: &mut Document,
        button: MouseButton,
        point: Point,
    ) -> Result<()> {
        if button != MouseButton::Left {
            return Ok(());
        }

        match std::mem::replace(&mut self.state, DrawingState::Idle) {
            DrawingState::Drawing {
                tool,
                origin,
                mut shape,
            } => {
                self.extend_shape(&mut shape, origin, point);
                self.needs_redraw = true;
                if shape.is_degenerate() {
                    log::debug!("Discarding empty {} gesture", tool.name());
                    return Ok(());
                }

                let id = document.insert(shape.clone())?;
                if tool == Tool::Text {
                    document.select(Some(id))?;
                    self.state = DrawingState::EditingText {
                        id,
                        original: shape,
                    };
                }
                Ok(())
            }
            DrawingState::Dragging { id, original, .. } => {
                if document.commit_preview(id, original)? {
                    log::debug!("Committed drag of {}", id);
                }
                self.state = DrawingState::Selected { id };
                self.needs_redraw = true;
                Ok(())
            }
            other => {
                self.state = other;
                Ok(())
            }
        }
    }

    /// Drops an in-progress drawing or drag. Other states are left alone.
    pub(super) fn cancel_gesture(&mut self, document: &mut Document) -> Result<()> {
        if matches!(
            self.state,
            DrawingState::Drawing { .. } | DrawingState::Dragging { .. }
        ) {
            self.settle(document)?;
        }
        Ok(())
    }
}
