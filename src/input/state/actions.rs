use crate::draw::Shape;
use crate::error::Result;
use crate::input::events::Key;
use crate::scene::Document;

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a key press.
    ///
    /// Handles modifier tracking, undo/redo shortcuts, text entry while
    /// editing, deletion of the selection and cancellation with Escape.
    pub fn on_key_press(&mut self, document: &mut Document, key: Key) -> Result<()> {
        if self.modifiers.update(key, true) {
            return Ok(());
        }

        if self.modifiers.ctrl {
            if let Key::Char(c) = key {
                match c.to_ascii_lowercase() {
                    'z' if self.modifiers.shift => return self.redo(document),
                    'z' => return self.undo(document),
                    'y' => return self.redo(document),
                    _ => {}
                }
            }
        }

        if let DrawingState::EditingText { id, .. } = self.state {
            return self.edit_text(document, id, key);
        }

        match key {
            Key::Escape => match self.state {
                DrawingState::Drawing { .. } | DrawingState::Dragging { .. } => {
                    self.cancel_gesture(document)
                }
                DrawingState::Selected { .. } => {
                    document.select(None)?;
                    self.state = DrawingState::Idle;
                    self.needs_redraw = true;
                    Ok(())
                }
                _ => Ok(()),
            },
            Key::Delete | Key::Backspace => {
                if let DrawingState::Selected { id } = self.state {
                    document.remove(id)?;
                    log::debug!("Deleted {}", id);
                    self.state = DrawingState::Idle;
                    self.needs_redraw = true;
                }
                Ok(())
            }
            Key::Return => {
                if let DrawingState::Selected { id } = self.state {
                    let shape = &document.scene().require(id)?.shape;
                    if matches!(shape, Shape::Text { .. }) {
                        self.state = DrawingState::EditingText {
                            id,
                            original: shape.clone(),
                        };
                        self.needs_redraw = true;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Processes a key release; only modifier state is affected.
    pub fn on_key_release(&mut self, key: Key) {
        self.modifiers.update(key, false);
    }

    /// Reverts the last edit after settling any in-flight gesture.
    pub fn undo(&mut self, document: &mut Document) -> Result<()> {
        self.settle(document)?;
        if document.undo()? {
            self.sync_with_selection(document);
        }
        Ok(())
    }

    /// Reapplies the last undone edit after settling any in-flight gesture.
    ///
    /// Finishing a text edit records a new change, which clears the redo history.
    pub fn redo(&mut self, document: &mut Document) -> Result<()> {
        self.settle(document)?;
        if document.redo()? {
            self.sync_with_selection(document);
        }
        Ok(())
    }

    fn edit_text(
        &mut self,
        document: &mut Document,
        id: crate::scene::AnnotationId,
        key: Key,
    ) -> Result<()> {
        let mut shape = document.scene().require(id)?.shape.clone();
        let Shape::Text { content, .. } = &mut shape else {
            // Only text can be edited; fall back to a plain selection.
            self.state = DrawingState::Selected { id };
            return Ok(());
        };

        match key {
            Key::Return if self.modifiers.shift => content.push('\n'),
            Key::Return | Key::Escape => return self.settle(document),
            Key::Backspace => {
                if content.pop().is_none() {
                    return Ok(());
                }
            }
            Key::Space => content.push(' '),
            Key::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => content.push(c),
            _ => return Ok(()),
        }

        document.preview_update(id, shape)?;
        self.needs_redraw = true;
        Ok(())
    }
}
