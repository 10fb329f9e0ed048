//! Tool state machine and input state management.

use crate::draw::{ResizeHandle, Shape};
use crate::error::Result;
use crate::input::{modifiers::Modifiers, style::ToolStyle, tool::Tool, view::ViewTransform};
use crate::scene::{AnnotationId, Document};
use crate::util::{Point, Rect};

/// What a drag on an existing annotation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Translate the whole annotation
    Move,
    /// Drag one handle while the opposite corner stays put
    Resize(ResizeHandle),
}

/// Current interaction state.
///
/// Transitions are driven by pointer and keyboard events; every transition
/// that changes what is on screen raises [`InputState::needs_redraw`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingState {
    /// Waiting for input, nothing selected
    Idle,
    /// Pointer held with a creation tool; `shape` is not yet in the scene
    Drawing {
        tool: Tool,
        /// Image-space press position
        origin: Point,
        shape: Shape,
    },
    /// One annotation selected, pointer released
    Selected { id: AnnotationId },
    /// Pointer held on a selected annotation
    Dragging {
        id: AnnotationId,
        kind: DragKind,
        /// Image-space press position
        origin: Point,
        /// Shape before the drag began, restored on cancel
        original: Shape,
    },
    /// Typing into a text annotation
    EditingText {
        id: AnnotationId,
        /// Shape before editing began; the whole edit commits as one change
        original: Shape,
    },
}

/// Input state for one editing session.
///
/// Owns the active tool, the style for new annotations, modifier keys and
/// the state machine. The scene itself lives in a [`Document`] passed to each
/// handler, so the caller stays the single owner of all edits.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Active tool
    pub(super) tool: Tool,
    /// Style applied to new annotations
    pub style: ToolStyle,
    /// Screen-to-image mapping, used to scale handle tolerances
    pub view: ViewTransform,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Current interaction state
    pub state: DrawingState,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(ToolStyle::default())
    }
}

impl InputState {
    pub fn new(style: ToolStyle) -> Self {
        Self {
            tool: Tool::default(),
            style,
            view: ViewTransform::identity(),
            modifiers: Modifiers::new(),
            state: DrawingState::Idle,
            needs_redraw: true,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches the active tool.
    ///
    /// In-flight gestures are finished or cancelled first; switching to any
    /// tool other than Select also clears the selection.
    pub fn set_tool(&mut self, document: &mut Document, tool: Tool) -> Result<()> {
        if self.tool == tool {
            return Ok(());
        }
        self.settle(document)?;
        self.tool = tool;
        if tool != Tool::Select && document.scene().selection().is_some() {
            document.select(None)?;
            self.state = DrawingState::Idle;
        }
        log::debug!("Tool changed to {}", tool.name());
        self.needs_redraw = true;
        Ok(())
    }

    /// The shape being drawn but not yet inserted, for live preview.
    pub fn in_progress_shape(&self) -> Option<&Shape> {
        match &self.state {
            DrawingState::Drawing { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Annotation currently held by the state machine, if any.
    pub fn active_id(&self) -> Option<AnnotationId> {
        match &self.state {
            DrawingState::Selected { id }
            | DrawingState::Dragging { id, .. }
            | DrawingState::EditingText { id, .. } => Some(*id),
            DrawingState::Idle | DrawingState::Drawing { .. } => None,
        }
    }

    pub fn is_editing_text(&self) -> bool {
        matches!(self.state, DrawingState::EditingText { .. })
    }

    /// Ends the current gesture so the document is stable.
    ///
    /// Text edits are committed, or dropped when the text ended up blank;
    /// drawings and drags are dropped with the dragged annotation restored to
    /// its pre-drag geometry.
    pub(crate) fn settle(&mut self, document: &mut Document) -> Result<()> {
        match std::mem::replace(&mut self.state, DrawingState::Idle) {
            DrawingState::Idle => {}
            DrawingState::Drawing { tool, .. } => {
                log::debug!("Cancelled {} gesture", tool.name());
                self.needs_redraw = true;
            }
            DrawingState::Selected { id } => {
                self.state = DrawingState::Selected { id };
            }
            DrawingState::Dragging { id, original, .. } => {
                document.cancel_preview(id, original)?;
                log::debug!("Cancelled drag of {}", id);
                self.state = DrawingState::Selected { id };
                self.needs_redraw = true;
            }
            DrawingState::EditingText { id, original } => {
                let blank = matches!(
                    &document.scene().require(id)?.shape,
                    Shape::Text { content, .. } if content.trim().is_empty()
                );
                if blank {
                    // A fresh box vanishes without a trace; a re-edited one is removed undoably.
                    document.cancel_preview(id, original)?;
                    document.retract_insert(id)?;
                    log::debug!("Dropped empty text {}", id);
                } else {
                    document.commit_preview(id, original)?;
                    log::debug!("Finished editing text {}", id);
                    self.state = DrawingState::Selected { id };
                }
                self.needs_redraw = true;
            }
        }
        Ok(())
    }

    /// Aligns the state with the document selection after undo/redo.
    pub(crate) fn sync_with_selection(&mut self, document: &Document) {
        self.state = match document.scene().selection() {
            Some(id) => DrawingState::Selected { id },
            None => DrawingState::Idle,
        };
        self.needs_redraw = true;
    }

    /// Starting geometry for a creation tool pressed at `point`.
    pub(super) fn begin_shape(&self, tool: Tool, point: Point) -> Option<Shape> {
        let style = &self.style;
        let shape = match tool {
            Tool::Pen => Shape::Pen {
                points: vec![point],
                color: style.color,
                width: style.stroke_width,
            },
            Tool::Highlighter => Shape::Highlighter {
                points: vec![point],
                color: style.highlighter_color(),
                width: style.highlighter_width,
            },
            Tool::Arrow | Tool::Line => Shape::Line {
                start: point,
                end: point,
                color: style.color,
                width: style.stroke_width,
                arrow_head: tool == Tool::Arrow,
                head_size: style.arrow_head_size,
            },
            Tool::Square => Shape::Rectangle {
                top_left: point,
                bottom_right: point,
                fill: style.fill,
                stroke: style.color,
                stroke_width: style.stroke_width,
                corner_radius: style.corner_radius,
            },
            Tool::Circle => Shape::Ellipse {
                bounds: Rect::new(point.x, point.y, 0.0, 0.0),
                fill: style.fill,
                stroke: style.color,
                stroke_width: style.stroke_width,
            },
            Tool::Censor => Shape::Censor {
                bounds: Rect::new(point.x, point.y, 0.0, 0.0),
                strength: style.censor_block,
            },
            Tool::Text => Shape::Text {
                anchor: point,
                content: String::new(),
                font_size: style.font_size,
                color: style.color,
                font: style.font.clone(),
            },
            Tool::Number | Tool::Select => return None,
        };
        Some(shape)
    }

    /// Updates in-progress geometry for the pointer at `point`.
    ///
    /// Holding Shift constrains boxes to squares.
    pub(super) fn extend_shape(&self, shape: &mut Shape, origin: Point, point: Point) {
        let corner = if self.modifiers.shift {
            let dx = point.x - origin.x;
            let dy = point.y - origin.y;
            let side = dx.abs().max(dy.abs());
            Point::new(origin.x + side.copysign(dx), origin.y + side.copysign(dy))
        } else {
            point
        };

        match shape {
            Shape::Pen { points, .. } | Shape::Highlighter { points, .. } => {
                if points.last() != Some(&point) {
                    points.push(point);
                }
            }
            Shape::Line { end, .. } => *end = point,
            Shape::Rectangle {
                top_left,
                bottom_right,
                ..
            } => {
                let rect = Rect::from_corners(origin, corner);
                *top_left = rect.min();
                *bottom_right = rect.max();
            }
            Shape::Ellipse { bounds, .. } | Shape::Censor { bounds, .. } => {
                *bounds = Rect::from_corners(origin, corner);
            }
            Shape::Text { .. } | Shape::NumberMarker { .. } => {}
        }
    }
}
