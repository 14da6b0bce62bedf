//! # pb-editor
//!
//! Editing on top of the `pb-core` document model: all-or-nothing mutation
//! operations, snapshot undo/redo, the single-slot clipboard, drag-and-drop
//! classification, and keyboard shortcuts, tied together by [`Editor`].

pub mod clipboard;
pub mod config;
pub mod drag;
pub mod editor;
pub mod errors;
pub mod history;
pub mod mutations;
pub mod shortcuts;

pub use clipboard::Clipboard;
pub use config::EditorConfig;
pub use drag::{Bounds, DragSession, DragSource, DropIntent, DropPosition, PointerSample, classify_drop};
pub use editor::Editor;
pub use errors::{EditError, EditResult};
pub use history::{History, HistoryEntry};
pub use shortcuts::{Modifiers, ShortcutAction, ShortcutMap};
