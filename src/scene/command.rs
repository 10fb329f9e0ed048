//! Reversible scene edits.

use super::{Annotation, AnnotationId, Scene};
use crate::draw::{Background, FrameConfig, Shape};
use crate::error::Result;

/// An atomic, reversible change to a [`Scene`].
///
/// Every variant carries enough state to build its exact inverse, so undo
/// never needs a snapshot of the whole scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Place `annotation` at paint position `index`.
    Insert { annotation: Annotation, index: usize },
    /// Take `annotation` out; `index` is where it sat, used to put it back.
    Remove { annotation: Annotation, index: usize },
    /// Swap the geometry/style of an existing annotation.
    Replace {
        id: AnnotationId,
        old: Shape,
        new: Shape,
    },
    /// Move an annotation from paint position `from` to `to`.
    Reorder {
        id: AnnotationId,
        from: usize,
        to: usize,
    },
    /// Swap the whole annotation list, e.g. clearing every annotation at once.
    SetAnnotations {
        old: Vec<Annotation>,
        new: Vec<Annotation>,
    },
    SetBackground { old: Background, new: Background },
    SetFrameConfig { old: FrameConfig, new: FrameConfig },
}

impl Command {
    /// Applies the command. On error the scene is left untouched.
    pub(crate) fn apply(&self, scene: &mut Scene) -> Result<()> {
        match self {
            Command::Insert { annotation, index } => scene.insert_at(*index, annotation.clone()),
            Command::Remove { annotation, .. } => scene.remove_by_id(annotation.id).map(|_| ()),
            Command::Replace { id, new, .. } => scene.replace_shape(*id, new.clone()),
            Command::Reorder { id, to, .. } => scene.move_to(*id, *to),
            Command::SetAnnotations { new, .. } => scene.replace_annotations(new.clone()),
            Command::SetBackground { new, .. } => {
                scene.set_background(new.clone());
                Ok(())
            }
            Command::SetFrameConfig { new, .. } => {
                scene.set_frame_config(*new);
                Ok(())
            }
        }
    }

    /// The command that undoes this one.
    pub fn inverse(&self) -> Command {
        match self {
            Command::Insert { annotation, index } => Command::Remove {
                annotation: annotation.clone(),
                index: *index,
            },
            Command::Remove { annotation, index } => Command::Insert {
                annotation: annotation.clone(),
                index: *index,
            },
            Command::Replace { id, old, new } => Command::Replace {
                id: *id,
                old: new.clone(),
                new: old.clone(),
            },
            Command::Reorder { id, from, to } => Command::Reorder {
                id: *id,
                from: *to,
                to: *from,
            },
            Command::SetAnnotations { old, new } => Command::SetAnnotations {
                old: new.clone(),
                new: old.clone(),
            },
            Command::SetBackground { old, new } => Command::SetBackground {
                old: new.clone(),
                new: old.clone(),
            },
            Command::SetFrameConfig { old, new } => Command::SetFrameConfig {
                old: *new,
                new: *old,
            },
        }
    }

    /// Short description for logs.
    pub fn label(&self) -> String {
        match self {
            Command::Insert { annotation, .. } => {
                format!("insert {} {}", annotation.shape.kind_name(), annotation.id)
            }
            Command::Remove { annotation, .. } => {
                format!("remove {} {}", annotation.shape.kind_name(), annotation.id)
            }
            Command::Replace { id, new, .. } => format!("edit {} {}", new.kind_name(), id),
            Command::Reorder { id, from, to } => format!("reorder {} {}->{}", id, from, to),
            Command::SetAnnotations { new, .. } if new.is_empty() => "clear annotations".to_string(),
            Command::SetAnnotations { new, .. } => format!("restore {} annotations", new.len()),
            Command::SetBackground { .. } => "set background".to_string(),
            Command::SetFrameConfig { .. } => "set frame".to_string(),
        }
    }
}
