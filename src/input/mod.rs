//! Input handling and tool state machine.
//!
//! This module translates pointer and keyboard events (already mapped into
//! image space by the view layer) into scene edits. It keeps the active tool,
//! the style applied to new annotations, and the state machine for drawing,
//! selecting, dragging and text editing.

pub mod events;
pub mod modifiers;
pub mod state;
pub mod style;
pub mod tool;
pub mod view;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton};
pub use modifiers::Modifiers;
pub use state::{DragKind, DrawingState, InputState};
pub use style::ToolStyle;
pub use tool::Tool;
pub use view::ViewTransform;
