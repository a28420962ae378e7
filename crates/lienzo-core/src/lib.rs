//! Lienzo Core Library
//!
//! Document model, layer ordering and undo/redo history for the Lienzo vector editor.

pub mod config;
pub mod document;
pub mod grid;
pub mod history;
pub mod import;
pub mod layers;
pub mod session;
pub mod shapes;
pub mod shortcuts;
pub mod tools;

pub use config::{CANVAS_PRESETS, CanvasPreset, EditorConfig};
pub use document::{Document, DocumentError, DocumentResult, Snapshot};
pub use grid::{GRID_SIZE, grid_lines, snap_to_grid};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryLog};
pub use import::{ImportError, ImportResult};
pub use layers::{LayerEntry, display_to_stack, drop_reorder, layer_list, stack_to_display};
pub use session::{DocumentObserver, DragDropSupport, EditorSession, SessionError, SessionResult};
pub use shapes::{ObjectId, SerializableColor, Shape, ShapeKind, ShapeStyle};
pub use shortcuts::{EditorCommand, Key, KeyInput, Modifiers};
pub use tools::ToolKind;
