//! Screenshot framing and annotation engine.
//!
//! The crate is split the way an editor front-end consumes it:
//! - [`draw`]: background generation, frame compositing and annotation painting
//! - [`scene`]: the annotation document, reversible commands and hit testing
//! - [`input`]: the tool state machine that turns pointer/keyboard events into edits
//! - [`render`]: display/export compositing plus a last-request-wins render worker
//! - [`export`]: flattening a scene to PNG, JPEG or WebP and delivering it to a file or clipboard
//! - [`session`]: one editing session tying the above together
//!
//! Configuration lives in [`config`] and is shared with the command-line front-end.

pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod input;
pub mod render;
pub mod scene;
pub mod session;
pub mod source;
pub mod util;

pub use config::Config;
pub use error::{EngineError, Result};
pub use session::EditorSession;
