//! Linear undo/redo history.

use super::AnnotationId;
use super::command::Command;

/// One recorded edit plus the selection around it.
///
/// Selection is not itself undoable, but restoring it alongside each command
/// keeps undo/redo exact for the whole scene.
#[derive(Clone, Debug)]
pub(crate) struct HistoryEntry {
    pub(crate) command: Command,
    pub(crate) selection_before: Option<AnnotationId>,
    pub(crate) selection_after: Option<AnnotationId>,
}

/// Manages the history of applied commands for undo/redo.
#[derive(Debug, Default)]
pub struct CommandStack {
    /// Applied commands, most recent last
    undone: Vec<HistoryEntry>,
    /// Undone commands available to reapply, most recently undone last
    redone: Vec<HistoryEntry>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly applied command. Any redo history is discarded.
    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        log::debug!(
            "History: {} (dropping {} redo entries)",
            entry.command.label(),
            self.redone.len()
        );
        self.undone.push(entry);
        self.redone.clear();
    }

    pub(crate) fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undone.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redone.pop()
    }

    pub(crate) fn push_undone(&mut self, entry: HistoryEntry) {
        self.undone.push(entry);
    }

    pub(crate) fn push_redone(&mut self, entry: HistoryEntry) {
        self.redone.push(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redone.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undone.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redone.len()
    }

    /// Command that the next `undo` would revert.
    pub fn peek_undo(&self) -> Option<&Command> {
        self.undone.last().map(|entry| &entry.command)
    }

    pub fn clear(&mut self) {
        self.undone.clear();
        self.redone.clear();
    }
}
