//! Scene plus history: the only way user edits reach a [`Scene`].

use super::command::Command;
use super::history::{CommandStack, HistoryEntry};
use super::{Annotation, AnnotationId, Scene};
use crate::draw::{Background, FrameConfig, Shape};
use crate::error::Result;

/// A scene together with its undo/redo history.
///
/// Every mutating operation except [`Document::select`] and
/// [`Document::preview_update`] is recorded as a [`Command`] and clears the
/// redo history.
#[derive(Debug, Default)]
pub struct Document {
    scene: Scene,
    history: CommandStack,
}

impl Document {
    pub fn new(background: Background, frame: FrameConfig) -> Self {
        Self::from_scene(Scene::new(background, frame))
    }

    pub fn from_scene(scene: Scene) -> Self {
        Self {
            scene,
            history: CommandStack::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let selection_before = self.scene.selection();
        command.apply(&mut self.scene)?;
        self.history.record(HistoryEntry {
            command,
            selection_before,
            selection_after: self.scene.selection(),
        });
        Ok(())
    }

    /// Adds `shape` on top of the paint order and returns its new id.
    pub fn insert(&mut self, shape: Shape) -> Result<AnnotationId> {
        let id = self.scene.allocate_id();
        let index = self.scene.len();
        self.execute(Command::Insert {
            annotation: Annotation { id, shape },
            index,
        })?;
        Ok(id)
    }

    pub fn remove(&mut self, id: AnnotationId) -> Result<()> {
        let index = self
            .scene
            .index_of(id)
            .ok_or(crate::EngineError::UnknownAnnotationId(id))?;
        let annotation = self.scene.annotations()[index].clone();
        self.execute(Command::Remove { annotation, index })
    }

    /// Replaces the shape of `id`. Identical shapes record nothing.
    pub fn update(&mut self, id: AnnotationId, shape: Shape) -> Result<()> {
        let old = self.scene.require(id)?.shape.clone();
        if old == shape {
            return Ok(());
        }
        self.execute(Command::Replace {
            id,
            old,
            new: shape,
        })
    }

    /// Moves `id` to paint position `new_index` (clamped to the top).
    pub fn reorder(&mut self, id: AnnotationId, new_index: usize) -> Result<()> {
        let from = self
            .scene
            .index_of(id)
            .ok_or(crate::EngineError::UnknownAnnotationId(id))?;
        let to = new_index.min(self.scene.len() - 1);
        if from == to {
            return Ok(());
        }
        self.execute(Command::Reorder { id, from, to })
    }

    /// Selects `id`, or clears the selection with `None`. Not recorded in history.
    pub fn select(&mut self, id: Option<AnnotationId>) -> Result<()> {
        if let Some(id) = id {
            self.scene.require(id)?;
        }
        self.scene.set_selection(id);
        Ok(())
    }

    /// Removes every annotation as one undoable edit. Returns `false` when already empty.
    pub fn clear_annotations(&mut self) -> Result<bool> {
        if self.scene.is_empty() {
            return Ok(false);
        }
        let old = self.scene.annotations().to_vec();
        self.execute(Command::SetAnnotations {
            old,
            new: Vec::new(),
        })?;
        Ok(true)
    }

    /// Takes back the most recent insert of `id` without leaving a history entry.
    ///
    /// When other edits were recorded since, the annotation is removed as a
    /// normal undoable edit instead.
    pub fn retract_insert(&mut self, id: AnnotationId) -> Result<()> {
        let is_last_insert = matches!(
            self.history.peek_undo(),
            Some(Command::Insert { annotation, .. }) if annotation.id == id
        );
        if !is_last_insert {
            return self.remove(id);
        }
        self.scene.remove_by_id(id)?;
        if let Some(entry) = self.history.pop_undo() {
            self.scene.set_selection(entry.selection_before);
            log::debug!("Retracted {}", entry.command.label());
        }
        Ok(())
    }

    pub fn set_background(&mut self, background: Background) -> Result<()> {
        if *self.scene.background() == background {
            return Ok(());
        }
        let old = self.scene.background().clone();
        self.execute(Command::SetBackground {
            old,
            new: background,
        })
    }

    pub fn set_frame_config(&mut self, frame: FrameConfig) -> Result<()> {
        let old = *self.scene.frame_config();
        if old == frame {
            return Ok(());
        }
        self.execute(Command::SetFrameConfig { old, new: frame })
    }

    /// Live update during a drag or text edit, without touching history.
    ///
    /// Pair with [`Document::commit_preview`] once the gesture ends.
    pub fn preview_update(&mut self, id: AnnotationId, shape: Shape) -> Result<()> {
        self.scene.replace_shape(id, shape)
    }

    /// Records a whole previewed gesture as one `Replace` from `original` to the current shape.
    ///
    /// Returns `false` when the gesture ended where it started.
    pub fn commit_preview(&mut self, id: AnnotationId, original: Shape) -> Result<bool> {
        let current = self.scene.require(id)?.shape.clone();
        if current == original {
            return Ok(false);
        }
        self.execute(Command::Replace {
            id,
            old: original,
            new: current,
        })?;
        Ok(true)
    }

    /// Restores a previewed annotation to `original` without recording anything.
    pub fn cancel_preview(&mut self, id: AnnotationId, original: Shape) -> Result<()> {
        self.scene.replace_shape(id, original)
    }

    /// Reverts the most recent command. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(mut entry) = self.history.pop_undo() else {
            return Ok(false);
        };

        // Remember the selection as it is now so redo lands on the same state.
        entry.selection_after = self.scene.selection();
        if let Err(err) = entry.command.inverse().apply(&mut self.scene) {
            self.history.push_undone(entry);
            return Err(err);
        }
        self.scene.set_selection(entry.selection_before);
        log::debug!("Undo: {}", entry.command.label());
        self.history.push_redone(entry);
        Ok(true)
    }

    /// Reapplies the most recently undone command. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(entry) = self.history.pop_redo() else {
            return Ok(false);
        };

        if let Err(err) = entry.command.apply(&mut self.scene) {
            self.history.push_redone(entry);
            return Err(err);
        }
        self.scene.set_selection(entry.selection_after);
        log::debug!("Redo: {}", entry.command.label());
        self.history.push_undone(entry);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
