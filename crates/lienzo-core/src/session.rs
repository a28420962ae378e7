//! Editor session: one document, its history, selection, clipboard and observers.
//!
//! Every user-facing operation goes through [`EditorSession`]. Operations that change
//! the user's content end with a single history save followed by observer notification.

use crate::config::{CanvasPreset, EditorConfig};
use crate::document::{Document, DocumentError};
use crate::grid::{grid_lines, snap_to_grid};
use crate::history::HistoryLog;
use crate::import::{self, ImportError, ImportKind};
use crate::layers::{self, LayerEntry};
use crate::shapes::{ObjectId, Shape, ShapeStyle, Text};
use crate::shortcuts::{EditorCommand, KeyInput, command_for};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect, Size};
use std::path::Path;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Content of a freshly added text object.
pub const DEFAULT_TEXT: &str = "Doble clic para editar";

/// Hit tolerance for pointer selection, in pixels.
const HIT_TOLERANCE: f64 = 4.0;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(
        "Por favor, ingrese dimensiones válidas (entre {min} y {max} píxeles). Recibido: {width}x{height}"
    )]
    InvalidCanvasSize {
        width: f64,
        height: f64,
        min: f64,
        max: f64,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Whether the host supports drag-and-drop reordering of the layer panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragDropSupport {
    /// Not loaded yet; drop reordering is refused.
    #[default]
    Unavailable,
    Ready,
}

/// Receives change notifications from a session.
pub trait DocumentObserver {
    /// The document content, order or selection changed.
    fn document_changed(&mut self, _document: &Document, _layers: &[LayerEntry]) {}

    /// Undo/redo availability after a history change.
    fn history_changed(&mut self, _can_undo: bool, _can_redo: bool) {}

    /// A user-facing status message.
    fn status(&mut self, _message: &str) {}
}

/// Interactive editing context.
pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    history: HistoryLog,
    /// Selected object ids, in selection order.
    selection: Vec<ObjectId>,
    clipboard: Vec<Shape>,
    canvas_size: Size,
    show_grid: bool,
    snap_to_grid: bool,
    tools: ToolManager,
    /// Style applied to newly drawn shapes.
    style: ShapeStyle,
    /// Deadline of the history write owed by the last nudge.
    pending_nudge: Option<Instant>,
    drag_drop: DragDropSupport,
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("document", &self.document)
            .field("history", &self.history)
            .field("selection", &self.selection)
            .field("canvas_size", &self.canvas_size)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Create a session with an empty document. The empty state is the first history entry.
    pub fn new(config: EditorConfig) -> Self {
        let mut document = Document::new();
        document.set_background(config.background);
        let mut session = Self {
            history: HistoryLog::new(config.history_capacity),
            canvas_size: config.canvas_size(),
            style: config.default_style(),
            document,
            selection: Vec::new(),
            clipboard: Vec::new(),
            show_grid: false,
            snap_to_grid: false,
            tools: ToolManager::new(),
            pending_nudge: None,
            drag_drop: DragDropSupport::default(),
            observers: Vec::new(),
            config,
        };
        if let Err(e) = session.history.save(&session.document) {
            log::error!("Failed to save initial history entry: {e}");
        }
        session
    }

    /// Register an observer. It immediately receives the current state.
    pub fn add_observer(&mut self, mut observer: Box<dyn DocumentObserver>) {
        observer.document_changed(&self.document, &self.layers());
        observer.history_changed(self.history.can_undo(), self.history.can_redo());
        self.observers.push(observer);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn is_snapping(&self) -> bool {
        self.snap_to_grid
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn current_style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn set_current_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    pub fn clipboard(&self) -> &[Shape] {
        &self.clipboard
    }

    pub fn drag_drop_support(&self) -> DragDropSupport {
        self.drag_drop
    }

    pub fn set_drag_drop_support(&mut self, support: DragDropSupport) {
        self.drag_drop = support;
    }

    pub fn has_pending_nudge(&self) -> bool {
        self.pending_nudge.is_some()
    }

    /// Layer panel rows, topmost first.
    pub fn layers(&self) -> Vec<LayerEntry> {
        layers::layer_list(&self.document, &self.selection)
    }

    /// Save the document as a new history entry and notify observers.
    fn commit(&mut self) {
        self.pending_nudge = None;
        if self.history.save(&self.document).is_err() {
            self.status("No se pudo guardar el historial");
        }
        self.notify();
    }

    fn notify(&mut self) {
        let layers = layers::layer_list(&self.document, &self.selection);
        let (can_undo, can_redo) = (self.history.can_undo(), self.history.can_redo());
        for observer in &mut self.observers {
            observer.document_changed(&self.document, &layers);
            observer.history_changed(can_undo, can_redo);
        }
    }

    fn status(&mut self, message: &str) {
        log::info!("{message}");
        for observer in &mut self.observers {
            observer.status(message);
        }
    }

    /// Drop selected ids that no longer exist.
    fn refresh_selection(&mut self) {
        let document = &self.document;
        self.selection.retain(|id| document.get(id).is_some());
    }

    fn selection_bounds(&self) -> Option<Rect> {
        self.selection
            .iter()
            .filter_map(|id| self.document.get(id))
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    // --- Drawing ---------------------------------------------------------

    /// Add a shape on top, select it and save history.
    pub fn add_object(&mut self, shape: Shape) -> ObjectId {
        let id = self.document.add_object(shape);
        self.selection = vec![id.clone()];
        self.commit();
        id
    }

    /// Create a shape from a drag with a drawing tool. Tiny drags create nothing.
    pub fn draw_shape(&mut self, tool: ToolKind, start: Point, end: Point) -> Option<ObjectId> {
        let (start, end) = (self.snap(start), self.snap(end));
        let shape = crate::tools::shape_from_drag(tool, start, end, &self.style)?;
        Some(self.add_object(shape))
    }

    /// Commit a pencil stroke.
    pub fn draw_freehand(&mut self, points: Vec<Point>) -> Option<ObjectId> {
        let shape = crate::tools::freehand_from_points(points, &self.style)?;
        Some(self.add_object(shape))
    }

    fn snap(&self, point: Point) -> Point {
        if self.snap_to_grid {
            snap_to_grid(point, self.config.grid_size)
        } else {
            point
        }
    }

    /// Select a tool. The text tool adds a text object and falls back to selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == ToolKind::Text {
            self.add_text();
            self.tools.set_tool(ToolKind::Select);
        } else {
            self.tools.set_tool(tool);
        }
    }

    /// Pointer press on the canvas.
    pub fn pointer_down(&mut self, point: Point) {
        if self.tools.current_tool == ToolKind::Select {
            self.select_at(point);
            return;
        }
        let point = if self.tools.current_tool == ToolKind::Freehand {
            point
        } else {
            self.snap(point)
        };
        self.tools.begin(point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        let point = if self.tools.current_tool == ToolKind::Freehand {
            point
        } else {
            self.snap(point)
        };
        self.tools.update(point);
    }

    /// Pointer release. A completed drawing is added and the tool reverts to selection.
    pub fn pointer_up(&mut self, point: Point) -> Option<ObjectId> {
        let point = if self.tools.current_tool == ToolKind::Freehand {
            point
        } else {
            self.snap(point)
        };
        let tool = self.tools.current_tool;
        let shape = self.tools.end(point, &self.style)?;
        let id = self.add_object(shape);
        if tool != ToolKind::Freehand {
            self.tools.set_tool(ToolKind::Select);
        }
        Some(id)
    }

    /// Add a text object centered on the canvas.
    pub fn add_text(&mut self) -> ObjectId {
        let text = Text::new(Point::ZERO, DEFAULT_TEXT).with_style(self.style.clone());
        let mut text = Shape::Text(text);
        let center = text.bounds().center();
        text.translate(
            self.canvas_size.width / 2.0 - center.x,
            self.canvas_size.height / 2.0 - center.y,
        );
        self.add_object(text)
    }

    // --- Removal ---------------------------------------------------------

    pub fn remove_object(&mut self, id: &ObjectId) -> bool {
        if self.document.remove_object(id).is_none() {
            return false;
        }
        self.refresh_selection();
        self.commit();
        true
    }

    /// Delete every selected object. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let removed = std::mem::take(&mut self.selection)
            .iter()
            .filter(|id| self.document.remove_object(id).is_some())
            .count();
        if removed > 0 {
            self.commit();
        }
        removed
    }

    /// Delete the object at a stack index.
    pub fn delete_at(&mut self, index: usize) -> bool {
        if self.document.remove_at(index).is_none() {
            return false;
        }
        self.refresh_selection();
        self.commit();
        true
    }

    // --- Ordering --------------------------------------------------------

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.commit_if(|doc| doc.reorder(from, to))
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        self.commit_if(|doc| doc.move_up(index))
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        self.commit_if(|doc| doc.move_down(index))
    }

    pub fn move_to_front(&mut self, index: usize) -> bool {
        self.commit_if(|doc| doc.move_to_front(index))
    }

    pub fn move_to_back(&mut self, index: usize) -> bool {
        self.commit_if(|doc| doc.move_to_back(index))
    }

    /// Apply a layer-panel drag from one row to another. Refused until drag-and-drop is ready.
    pub fn drop_reorder(&mut self, old_display: usize, new_display: usize) -> bool {
        if self.drag_drop == DragDropSupport::Unavailable {
            log::warn!("Drag-and-drop reordering is not available");
            return false;
        }
        self.commit_if(|doc| layers::drop_reorder(doc, old_display, new_display))
    }

    fn commit_if(&mut self, edit: impl FnOnce(&mut Document) -> bool) -> bool {
        let changed = edit(&mut self.document);
        if changed {
            self.commit();
        }
        changed
    }

    // --- Layer edits -----------------------------------------------------

    pub fn toggle_visibility(&mut self, index: usize) -> bool {
        self.commit_if(|doc| doc.toggle_visibility(index))
    }

    /// Duplicate the object at a stack index and select the copy.
    pub fn duplicate(&mut self, index: usize) -> Option<ObjectId> {
        let id = self
            .document
            .duplicate_with_offset(index, self.config.duplicate_offset)?;
        self.selection = vec![id.clone()];
        self.commit();
        Some(id)
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        self.commit_if(|doc| doc.rename(index, name))
    }

    // --- Selection -------------------------------------------------------

    /// Replace the selection. Unknown ids are ignored.
    pub fn select(&mut self, ids: &[ObjectId]) {
        self.selection = ids
            .iter()
            .filter(|id| self.document.get(id).is_some())
            .cloned()
            .collect();
        self.notify();
    }

    /// Select the object shown at a layer panel row.
    pub fn select_layer(&mut self, display_index: usize) -> bool {
        let Some(stack) = layers::display_to_stack(self.document.len(), display_index) else {
            return false;
        };
        let Some(id) = self.document.get_at(stack).map(|s| s.id().clone()) else {
            return false;
        };
        self.select(&[id]);
        true
    }

    /// Select the frontmost object under a point, or clear the selection.
    pub fn select_at(&mut self, point: Point) -> Option<ObjectId> {
        let hit = self
            .document
            .objects_at_point(point, HIT_TOLERANCE)
            .into_iter()
            .next();
        self.selection = hit.iter().cloned().collect();
        self.notify();
        hit
    }

    pub fn select_all(&mut self) {
        self.selection = self
            .document
            .objects()
            .filter(|s| s.meta().selectable)
            .map(|s| s.id().clone())
            .collect();
        self.notify();
    }

    pub fn deselect(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify();
        }
    }

    // --- Clipboard -------------------------------------------------------

    /// Copy the selection into the clipboard. Returns false when nothing is selected.
    pub fn copy(&mut self) -> bool {
        let copied: Vec<Shape> = self
            .document
            .objects()
            .filter(|s| self.selection.contains(s.id()))
            .cloned()
            .collect();
        if copied.is_empty() {
            return false;
        }
        log::debug!("Copied {} object(s)", copied.len());
        self.clipboard = copied;
        true
    }

    /// Paste the clipboard offset from the original, with fresh ids. Selects the pasted objects.
    pub fn paste(&mut self) -> Vec<ObjectId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let offset = self.config.duplicate_offset;
        let pasted: Vec<ObjectId> = self
            .clipboard
            .clone()
            .into_iter()
            .map(|shape| self.document.add_copy(shape, offset))
            .collect();
        self.selection = pasted.clone();
        self.commit();
        pasted
    }

    /// Duplicate the selection in place without touching the clipboard.
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        let indices: Vec<usize> = self
            .selection
            .iter()
            .filter_map(|id| self.document.index_of(id))
            .collect();
        let offset = self.config.duplicate_offset;
        let copies: Vec<ObjectId> = indices
            .into_iter()
            .filter_map(|i| self.document.duplicate_with_offset(i, offset))
            .collect();
        if !copies.is_empty() {
            self.selection = copies.clone();
            self.commit();
        }
        copies
    }

    // --- Nudge -----------------------------------------------------------

    /// Move the selection immediately and schedule one history write after the quiet period.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64, now: Instant) -> bool {
        let mut moved = false;
        for id in &self.selection {
            if let Some(shape) = self.document.get_mut(id) {
                shape.translate(dx, dy);
                moved = true;
            }
        }
        if moved {
            self.pending_nudge = Some(now + self.config.nudge_debounce());
            self.notify();
        }
        moved
    }

    /// Commit a pending nudge whose quiet period has elapsed. Returns true if one was saved.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_nudge {
            Some(deadline) if now >= deadline => {
                self.commit();
                true
            }
            _ => false,
        }
    }

    /// Commit a pending nudge right away.
    pub fn flush_pending_nudge(&mut self) -> bool {
        if self.pending_nudge.is_none() {
            return false;
        }
        self.commit();
        true
    }

    // --- History ---------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.flush_pending_nudge();
        let undone = self.history.undo(&mut self.document);
        if undone {
            self.refresh_selection();
            self.notify();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.flush_pending_nudge();
        let redone = self.history.redo(&mut self.document);
        if redone {
            self.refresh_selection();
            self.notify();
        }
        redone
    }

    // --- Styling and canvas ---------------------------------------------

    /// Apply a style to the selection. History is saved only if something changed.
    pub fn update_selected_style(&mut self, style: &ShapeStyle) -> bool {
        self.style = style.clone();
        let mut changed = false;
        for id in &self.selection {
            if let Some(shape) = self.document.get_mut(id) {
                changed |= apply_style(shape, style);
            }
        }
        if changed {
            self.commit();
        }
        changed
    }

    /// Center the selection on the canvas.
    pub fn center_selected(&mut self) -> bool {
        let Some(bounds) = self.selection_bounds() else {
            self.status("Seleccione al menos un objeto para centrar");
            return false;
        };
        let center = bounds.center();
        let dx = self.canvas_size.width / 2.0 - center.x;
        let dy = self.canvas_size.height / 2.0 - center.y;
        for id in &self.selection {
            if let Some(shape) = self.document.get_mut(id) {
                shape.translate(dx, dy);
            }
        }
        self.commit();
        true
    }

    /// Resize the canvas. Both sides must be within the configured limits.
    pub fn resize_canvas(&mut self, width: f64, height: f64) -> SessionResult<()> {
        if !self.config.is_valid_canvas_dimension(width)
            || !self.config.is_valid_canvas_dimension(height)
        {
            let err = SessionError::InvalidCanvasSize {
                width,
                height,
                min: self.config.min_canvas_size,
                max: self.config.max_canvas_size,
            };
            log::warn!("{err}");
            self.status(&err.to_string());
            return Err(err);
        }
        self.canvas_size = Size::new(width, height);
        if self.show_grid {
            self.refresh_grid();
        }
        log::info!("Canvas resized to {width}x{height}");
        self.commit();
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: &CanvasPreset) -> SessionResult<()> {
        self.resize_canvas(preset.width, preset.height)
    }

    /// Switch between a transparent and a white background.
    pub fn set_transparent_background(&mut self, transparent: bool) {
        let background = if transparent {
            None
        } else {
            Some(crate::shapes::SerializableColor::white())
        };
        self.document.set_background(background);
        self.commit();
    }

    fn refresh_grid(&mut self) {
        if self.show_grid {
            self.document
                .set_grid_lines(grid_lines(self.canvas_size, self.config.grid_size));
        } else {
            self.document.clear_grid();
        }
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.refresh_grid();
        self.notify();
        self.show_grid
    }

    /// Enable or disable snapping. Enabling it also shows the grid.
    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
        if enabled && !self.show_grid {
            self.show_grid = true;
            self.refresh_grid();
            self.notify();
        }
    }

    // --- Grouping and reset ---------------------------------------------

    pub fn group_selected(&mut self) -> Option<ObjectId> {
        if self.selection.len() < 2 {
            self.status("Seleccione múltiples objetos para agrupar");
            return None;
        }
        let selection = self.selection.clone();
        let Some(id) = self.document.group(&selection) else {
            self.status("Seleccione múltiples objetos para agrupar");
            return None;
        };
        self.selection = vec![id.clone()];
        self.commit();
        Some(id)
    }

    pub fn ungroup_selected(&mut self) -> Option<Vec<ObjectId>> {
        let group = match self.selection.as_slice() {
            [id] if self.document.get(id).is_some_and(Shape::is_group) => id.clone(),
            _ => {
                self.status("Seleccione un grupo para desagrupar");
                return None;
            }
        };
        let children = self.document.ungroup(&group)?;
        self.selection = children.clone();
        self.commit();
        Some(children)
    }

    /// Discard everything and start over with an empty document and history.
    pub fn new_canvas(&mut self) {
        self.document.clear();
        self.document.set_background(self.config.background);
        self.refresh_grid();
        self.selection.clear();
        self.pending_nudge = None;
        self.tools.cancel();
        self.history.clear();
        log::info!("New canvas");
        self.commit();
    }

    // --- Import ----------------------------------------------------------

    /// Parse, fit and insert an SVG document as a group.
    pub fn import_svg(&mut self, name: &str, text: &str) -> SessionResult<ObjectId> {
        match import::parse_svg(text) {
            Ok(group) => Ok(self.insert_import(name, Shape::Group(group), true)),
            Err(e) => Err(self.import_failed(name, true, e)),
        }
    }

    /// Decode, fit and insert a raster image.
    pub fn import_raster(&mut self, name: &str, bytes: &[u8]) -> SessionResult<ObjectId> {
        match import::decode_raster(bytes) {
            Ok(image) => Ok(self.insert_import(name, Shape::Image(image), false)),
            Err(e) => Err(self.import_failed(name, false, e)),
        }
    }

    /// Import a file's content, deciding between SVG and raster from its name and bytes.
    pub fn import_bytes(&mut self, name: &str, bytes: &[u8]) -> SessionResult<ObjectId> {
        let is_svg = !matches!(import::detect(name, bytes), Ok(ImportKind::Raster(_)));
        match import::import_bytes(name, bytes) {
            Ok(shape) => Ok(self.insert_import(name, shape, is_svg)),
            Err(e) => Err(self.import_failed(name, is_svg, e)),
        }
    }

    /// Read and import a file. The document is touched once, after the content is ready.
    pub async fn import_file(&mut self, path: &Path) -> SessionResult<ObjectId> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = match read_file(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let is_svg = name.to_ascii_lowercase().ends_with(".svg");
                return Err(self.import_failed(&name, is_svg, e));
            }
        };
        self.import_bytes(&name, &bytes)
    }

    fn insert_import(&mut self, name: &str, mut shape: Shape, is_svg: bool) -> ObjectId {
        import::fit_to_canvas(&mut shape, self.canvas_size, self.config.import_margin);
        let id = self.add_object(shape);
        if is_svg {
            self.status(&format!("SVG cargado correctamente: {name}"));
        } else {
            self.status(&format!("Imagen cargada correctamente: {name}"));
        }
        id
    }

    fn import_failed(&mut self, name: &str, is_svg: bool, err: ImportError) -> SessionError {
        log::warn!("Import of {name} failed: {err}");
        if is_svg {
            self.status(&format!("Error al cargar el archivo SVG: {name}"));
        } else {
            self.status(&format!("Error al cargar la imagen: {name}"));
        }
        err.into()
    }

    // --- Keyboard --------------------------------------------------------

    /// Dispatch a key press. Returns true if it was handled.
    pub fn handle_key(&mut self, input: KeyInput, now: Instant) -> bool {
        let (step, large_step) = (self.config.nudge_step, self.config.nudge_step_large);
        let Some(command) = command_for(&input, step, large_step) else {
            return false;
        };
        log::debug!("Shortcut {command:?}");
        match command {
            EditorCommand::DeleteSelected => self.delete_selected() > 0,
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Copy => self.copy(),
            EditorCommand::Paste => !self.paste().is_empty(),
            EditorCommand::Duplicate => !self.duplicate_selected().is_empty(),
            EditorCommand::Deselect => {
                self.deselect();
                true
            }
            EditorCommand::Nudge { dx, dy } => self.nudge_selected(dx, dy, now),
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    Ok(std::fs::read(path)?)
}

/// Apply a style, recursing into groups. Lines and open paths never take a fill.
fn apply_style(shape: &mut Shape, style: &ShapeStyle) -> bool {
    if let Some(group) = shape.as_group_mut() {
        let mut changed = false;
        for child in group.children_mut() {
            changed |= apply_style(child, style);
        }
        return changed;
    }

    let fill = match shape {
        Shape::Line(_) => None,
        Shape::Freehand(path) if !path.closed => None,
        _ => style.fill,
    };
    let mut next = style.clone();
    next.fill = fill;
    next.set_opacity(style.opacity);

    let current = shape.style_mut();
    if *current == next {
        return false;
    }
    *current = next;
    true
}
