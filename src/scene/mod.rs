//! The annotation scene: background, frame settings and ordered annotations.
//!
//! A [`Scene`] is plain data. All user-visible edits go through a
//! [`Document`], which records each change as a reversible [`Command`] so it
//! can be undone. Annotations are addressed by [`AnnotationId`], never by
//! reference, so callers holding an id cannot outlive the annotation.

pub mod command;
pub mod document;
pub mod history;
pub mod hit;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use document::Document;
pub use history::CommandStack;
pub use hit::{HANDLE_TOLERANCE_PX, STROKE_HIT_SLACK, handle_test, hit_test};

use crate::draw::{Background, FrameConfig, Shape};
use crate::error::{EngineError, Result};
use std::fmt;

/// Stable identifier of an annotation within one scene. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One annotation placed in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub shape: Shape,
}

/// In-memory document state for one editing session.
///
/// Paint order is the order of [`Scene::annotations`]: later entries are drawn on top.
#[derive(Clone, Debug)]
pub struct Scene {
    background: Background,
    frame: FrameConfig,
    annotations: Vec<Annotation>,
    selection: Option<AnnotationId>,
    next_id: u64,
    next_marker: u32,
}

// Allocation counters only ever grow and are excluded from equality, so a
// scene compares equal to itself before an edit and after its undo.
impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.background == other.background
            && self.frame == other.frame
            && self.annotations == other.annotations
            && self.selection == other.selection
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Background::default(), FrameConfig::default())
    }
}

impl Scene {
    pub fn new(background: Background, frame: FrameConfig) -> Self {
        Self {
            background,
            frame,
            annotations: Vec::new(),
            selection: None,
            next_id: 1,
            next_marker: 1,
        }
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn frame_config(&self) -> &FrameConfig {
        &self.frame
    }

    /// Annotations in paint order (bottom first).
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn selection(&self) -> Option<AnnotationId> {
        self.selection
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.id == id)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Looks up `id`, reporting a missing id as [`EngineError::UnknownAnnotationId`].
    pub fn require(&self, id: AnnotationId) -> Result<&Annotation> {
        self.get(id).ok_or(EngineError::UnknownAnnotationId(id))
    }

    /// Sequence number the next number marker will carry.
    pub fn next_marker_index(&self) -> u32 {
        self.next_marker
    }

    pub(crate) fn allocate_id(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Raw mutations used by commands; they do not touch the history.
    // ------------------------------------------------------------------

    pub(crate) fn insert_at(&mut self, index: usize, annotation: Annotation) -> Result<()> {
        if self.contains(annotation.id) {
            return Err(EngineError::DuplicateAnnotationId(annotation.id));
        }
        if let Shape::NumberMarker { index: marker, .. } = &annotation.shape {
            self.next_marker = self.next_marker.max(marker.saturating_add(1));
        }
        self.next_id = self.next_id.max(annotation.id.0 + 1);
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
        Ok(())
    }

    pub(crate) fn remove_by_id(&mut self, id: AnnotationId) -> Result<Annotation> {
        let index = self
            .index_of(id)
            .ok_or(EngineError::UnknownAnnotationId(id))?;
        let removed = self.annotations.remove(index);
        if self.selection == Some(id) {
            self.selection = None;
        }
        Ok(removed)
    }

    pub(crate) fn replace_shape(&mut self, id: AnnotationId, shape: Shape) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or(EngineError::UnknownAnnotationId(id))?;
        self.annotations[index].shape = shape;
        Ok(())
    }

    pub(crate) fn move_to(&mut self, id: AnnotationId, index: usize) -> Result<()> {
        let from = self
            .index_of(id)
            .ok_or(EngineError::UnknownAnnotationId(id))?;
        let annotation = self.annotations.remove(from);
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
        Ok(())
    }

    /// Replaces the whole annotation list; counters never move backwards.
    pub(crate) fn replace_annotations(&mut self, annotations: Vec<Annotation>) -> Result<()> {
        for (index, annotation) in annotations.iter().enumerate() {
            if annotations[..index].iter().any(|a| a.id == annotation.id) {
                return Err(EngineError::DuplicateAnnotationId(annotation.id));
            }
        }
        for annotation in &annotations {
            if let Shape::NumberMarker { index: marker, .. } = &annotation.shape {
                self.next_marker = self.next_marker.max(marker.saturating_add(1));
            }
            self.next_id = self.next_id.max(annotation.id.0 + 1);
        }
        self.annotations = annotations;
        self.selection = self.selection.filter(|id| self.contains(*id));
        Ok(())
    }

    pub(crate) fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub(crate) fn set_frame_config(&mut self, frame: FrameConfig) {
        self.frame = frame;
    }

    /// Sets the selection; ids not present in the scene clear it instead.
    pub(crate) fn set_selection(&mut self, selection: Option<AnnotationId>) {
        self.selection = selection.filter(|id| self.contains(*id));
    }
}
