//! Interactive editing on top of the sketchpad document model.
//!
//! [`EditorSession`] owns one document and everything that changes while a
//! user works on it: the active [`Tool`], the current style, the viewport,
//! the in-progress [`DragSession`] and the undo [`History`]. Hosts feed it
//! [`PointerEvent`]s, [`WheelEvent`]s and [`KeyInput`]s.

pub mod config;
mod controller;
pub mod drag;
pub mod editor;
pub mod history;
pub mod input;
pub mod keymap;
pub mod tools;

pub use config::{EditorConfig, StrokeProfile};
pub use drag::DragSession;
pub use editor::EditorSession;
pub use history::{DEFAULT_HISTORY_CAP, History};
pub use input::{Key, KeyInput, Modifiers, PointerEvent, WheelEvent};
pub use keymap::{Command, command_for};
pub use tools::Tool;
