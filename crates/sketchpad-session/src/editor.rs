//! The editor session: one document, its history, the current style and the
//! active tool.
//!
//! Every public mutation either commits exactly one history snapshot or does
//! nothing. Invalid targets (empty selection, ungroup on a plain shape,
//! undo at the oldest entry) are no-ops reported through the return value.

use anyhow::Result;
use tracing::{debug, info, warn};

use sketchpad_core::{
    ColorHistory, Document, ImageRef, Locks, ReorderOp, Shape, ShapeId, ShapeKind, Style,
    StylePatch,
};
use sketchpad_geometry::{Bounds, Point, Viewport};

use crate::config::EditorConfig;
use crate::drag::DragSession;
use crate::history::History;
use crate::input::{Key, KeyInput};
use crate::keymap::{Command, command_for};
use crate::tools::Tool;

#[derive(Debug)]
pub struct EditorSession {
    pub(crate) doc: Document,
    pub(crate) history: History,
    pub(crate) style: Style,
    pub(crate) colors: ColorHistory,
    pub(crate) tool: Tool,
    pub(crate) viewport: Viewport,
    pub(crate) drag: Option<DragSession>,
    /// Text shape holding edit focus
    pub(crate) editing_text: Option<ShapeId>,
    pub(crate) sketch_mode: bool,
    pub(crate) image_requested: bool,
    pub(crate) config: EditorConfig,
}

impl EditorSession {
    /// Start with an empty document sized from the config
    pub fn new(config: EditorConfig) -> Result<Self> {
        let doc = Document::new(config.document_width, config.document_height)
            .with_background(config.background.clone());
        Self::with_document(doc, config)
    }

    /// Start editing an existing document; it becomes history entry 0
    pub fn with_document(doc: Document, config: EditorConfig) -> Result<Self> {
        let history = History::new(&doc, config.history_cap)?;
        Ok(Self {
            doc,
            history,
            style: Style::default(),
            colors: ColorHistory::new(config.color_history_cap),
            tool: Tool::Select,
            viewport: Viewport::default(),
            drag: None,
            editing_text: None,
            sketch_mode: false,
            image_requested: false,
            config,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn color_history(&self) -> &ColorHistory {
        &self.colors
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn editing_text(&self) -> Option<ShapeId> {
        self.editing_text
    }

    pub fn sketch_mode(&self) -> bool {
        self.sketch_mode
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Snapshot the live document. A snapshot that cannot be serialized is
    /// logged and skipped; the edit itself stands.
    pub(crate) fn commit(&mut self) {
        if let Err(e) = self.history.commit(&self.doc) {
            warn!(error = %format!("{e:#}"), "history commit failed");
        }
    }

    // ---- tools & style ----

    /// Switch tools. Blurs text, cancels an in-progress drag, and makes
    /// shapes click-through unless the new tool is `Select`.
    pub fn set_tool(&mut self, tool: Tool) {
        self.blur_text();
        if self.drag.is_some() {
            self.cancel_drag();
        }
        self.tool = match tool {
            Tool::Image => {
                self.image_requested = true;
                Tool::Select
            }
            other => other,
        };
        self.doc.set_selectable(self.tool == Tool::Select);
        debug!(tool = %self.tool, "tool changed");
    }

    /// Whether the image tool was picked since the last call. The host
    /// answers with [`EditorSession::insert_image`].
    pub fn take_image_request(&mut self) -> bool {
        std::mem::take(&mut self.image_requested)
    }

    /// Merge `patch` into the current style and push its visual subset onto
    /// the selection (and the text in edit focus). Commits only when a
    /// selected shape changed.
    pub fn set_style(&mut self, patch: &StylePatch) {
        self.style.merge(patch);
        for color in patch.colors() {
            self.colors.record(color);
        }
        if let Some(id) = self.editing_text {
            self.doc.apply_style(&[id], patch);
        }
        let ids = self.doc.selected_ids();
        if ids.is_empty() {
            return;
        }
        let touched = self.doc.apply_style(&ids, patch);
        if touched > 0 {
            debug!(touched, "style applied to selection");
            self.commit();
        }
    }

    pub fn set_sketch_mode(&mut self, enabled: bool) {
        self.sketch_mode = enabled;
    }

    // ---- history ----

    pub fn undo(&mut self) -> bool {
        self.settle();
        let restored = self.history.undo();
        self.restore(restored, "undo")
    }

    pub fn redo(&mut self) -> bool {
        self.settle();
        let restored = self.history.redo();
        self.restore(restored, "redo")
    }

    /// End transient interaction before history moves underneath it
    fn settle(&mut self) {
        self.blur_text();
        if self.drag.is_some() {
            self.cancel_drag();
        }
    }

    fn restore(&mut self, restored: Result<Option<Document>>, action: &str) -> bool {
        match restored {
            Ok(Some(doc)) => {
                let selected = self.doc.selected_ids();
                self.doc = doc;
                self.doc.set_selectable(self.tool == Tool::Select);
                if self.tool == Tool::Select {
                    self.doc.set_selection(selected);
                }
                debug!(position = self.history.position(), "{action}");
                true
            }
            Ok(None) => {
                debug!("nothing to {action}");
                false
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "{action} failed");
                false
            }
        }
    }

    // ---- selection operations ----

    pub fn delete_selected(&mut self) -> bool {
        let ids = self.doc.selected_ids();
        if ids.is_empty() {
            return false;
        }
        for id in &ids {
            self.doc.remove_shape(*id);
        }
        info!(count = ids.len(), "deleted shapes");
        self.commit();
        true
    }

    /// Clone the selection offset by the configured amount and select the
    /// clones
    pub fn duplicate_selected(&mut self) -> Vec<ShapeId> {
        let ids = self.doc.selected_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        let offset = self.config.duplicate_offset;
        let copies = self.doc.duplicate(&ids, offset, offset);
        self.doc.set_selection(copies.iter().copied());
        debug!(count = copies.len(), "duplicated shapes");
        self.commit();
        copies
    }

    /// Select every shape, switching to the select tool first so they can
    /// be manipulated. Selection is not persisted, so nothing is committed.
    pub fn select_all(&mut self) {
        if self.tool != Tool::Select {
            self.set_tool(Tool::Select);
        }
        self.doc.select_all();
    }

    pub fn select(&mut self, id: ShapeId) -> bool {
        self.tool == Tool::Select && self.doc.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.doc.clear_selection();
    }

    /// Reorder every selected shape, keeping their relative order
    pub fn reorder_selected(&mut self, op: ReorderOp) -> bool {
        let mut ids: Vec<(usize, ShapeId)> = self
            .doc
            .selected_ids()
            .into_iter()
            .filter_map(|id| self.doc.index_of(id).map(|i| (i, id)))
            .collect();
        ids.sort_by_key(|(i, _)| *i);
        // Walk so that each move leaves already-moved shapes in place
        if matches!(op, ReorderOp::Back | ReorderOp::Forward) {
            ids.reverse();
        }
        let mut changed = false;
        for (_, id) in ids {
            changed |= self.doc.reorder(id, op);
        }
        if changed {
            self.commit();
        }
        changed
    }

    pub fn group_selected(&mut self) -> Option<ShapeId> {
        let ids = self.doc.selected_ids();
        let group = self.doc.group(&ids)?;
        self.commit();
        Some(group)
    }

    /// Ungroup every selected group; the freed members become the selection
    pub fn ungroup_selected(&mut self) -> Vec<ShapeId> {
        let mut freed = Vec::new();
        for id in self.doc.selected_ids() {
            if let Some(members) = self.doc.ungroup(id) {
                freed.extend(members);
            }
        }
        if freed.is_empty() {
            return freed;
        }
        self.doc.set_selection(freed.iter().copied());
        self.commit();
        freed
    }

    // ---- transforms ----

    /// Translate the selection, skipping movement-locked shapes
    pub fn move_selected(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        if self.translate_selection(dx, dy) {
            self.commit();
            return true;
        }
        false
    }

    pub(crate) fn translate_selection(&mut self, dx: f64, dy: f64) -> bool {
        let mut moved = false;
        for id in self.doc.selected_ids() {
            if let Some(shape) = self.doc.get_mut(id)
                && !shape.locks.movement
            {
                shape.translate(dx, dy);
                moved = true;
            }
        }
        moved
    }

    /// Scale one shape so its bounds become `target`
    pub fn resize_shape(&mut self, id: ShapeId, target: Bounds) -> bool {
        if !target.min.is_finite() || !target.max.is_finite() {
            return false;
        }
        let Some(shape) = self.doc.get_mut(id) else {
            return false;
        };
        if shape.locks.scaling || !shape.resize_to(&target) {
            return false;
        }
        self.commit();
        true
    }

    /// Rotate the selection by `degrees` about each shape's own center
    pub fn rotate_selected(&mut self, degrees: f64) -> bool {
        if !degrees.is_finite() || degrees == 0.0 {
            return false;
        }
        let changed = self.update_selected(|shape| {
            if shape.locks.rotation {
                return false;
            }
            shape.angle = (shape.angle + degrees).rem_euclid(360.0);
            true
        });
        if changed {
            self.commit();
        }
        changed
    }

    /// Mirror the selection. Flipping counts as scaling for the lock.
    pub fn flip_selected(&mut self, horizontal: bool) -> bool {
        let changed = self.update_selected(|shape| {
            if shape.locks.scaling {
                return false;
            }
            if horizontal {
                shape.flip_x = !shape.flip_x;
            } else {
                shape.flip_y = !shape.flip_y;
            }
            true
        });
        if changed {
            self.commit();
        }
        changed
    }

    pub fn set_locks(&mut self, locks: Locks) -> bool {
        let changed = self.update_selected(|shape| {
            let differs = shape.locks != locks;
            shape.locks = locks;
            differs
        });
        if changed {
            self.commit();
        }
        changed
    }

    fn update_selected(&mut self, mut f: impl FnMut(&mut Shape) -> bool) -> bool {
        let mut changed = false;
        for id in self.doc.selected_ids() {
            if let Some(shape) = self.doc.get_mut(id) {
                changed |= f(shape);
            }
        }
        changed
    }

    // ---- document ----

    /// Insert a decoded bitmap at the document center, scaled down to fit
    /// the configured share of the document
    pub fn insert_image(&mut self, href: impl Into<String>, width: u32, height: u32) -> Option<ShapeId> {
        if width == 0 || height == 0 {
            debug!("ignoring empty image");
            return None;
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let ratio = self.config.image_fit_ratio;
        let max_w = f64::from(self.doc.width) * ratio;
        let max_h = f64::from(self.doc.height) * ratio;
        let scale = (max_w / w).min(max_h / h).min(1.0);
        let (w, h) = (w * scale, h * scale);

        let center = self.doc.center();
        let bounds = Bounds::from_origin_size(center.translated(-w / 2.0, -h / 2.0), w, h);
        let image = ImageRef { href: href.into(), width, height };
        let mut shape = Shape::new(ShapeKind::Image { bounds, image }, self.style.clone());
        shape.selectable = self.tool == Tool::Select;
        let id = self.doc.add_shape(shape);
        if self.tool == Tool::Select {
            self.doc.set_selection([id]);
        }
        info!(%id, width, height, scale, "inserted image");
        self.commit();
        Some(id)
    }

    pub fn resize_document(&mut self, width: u32, height: u32) -> bool {
        if !self.doc.resize(width, height) {
            return false;
        }
        info!(width, height, "resized document");
        self.commit();
        true
    }

    pub fn set_background(&mut self, color: impl Into<String>) -> bool {
        if !self.doc.set_background(color) {
            return false;
        }
        self.commit();
        true
    }

    /// Replace the document wholesale (an import). Undoable.
    pub fn load_document(&mut self, doc: Document) {
        self.settle();
        self.doc = doc;
        self.doc.set_selectable(self.tool == Tool::Select);
        info!(shapes = self.doc.len(), "loaded document");
        self.commit();
    }

    // ---- text ----

    /// Insert an empty text shape at `at` and give it edit focus
    pub(crate) fn begin_text(&mut self, at: Point) -> ShapeId {
        self.blur_text();
        let mut shape = Shape::new(
            ShapeKind::Text { origin: at, content: String::new() },
            self.style.clone(),
        );
        shape.selectable = false;
        let id = self.doc.add_shape(shape);
        self.editing_text = Some(id);
        debug!(%id, "text edit started");
        id
    }

    /// Replace the content of the focused text
    pub fn set_text(&mut self, text: &str) -> bool {
        self.edit_text(|content| {
            content.clear();
            content.push_str(text);
        })
    }

    pub fn push_text(&mut self, ch: char) -> bool {
        self.edit_text(|content| content.push(ch))
    }

    pub fn backspace_text(&mut self) -> bool {
        self.edit_text(|content| {
            content.pop();
        })
    }

    fn edit_text(&mut self, f: impl FnOnce(&mut String)) -> bool {
        let Some(id) = self.editing_text else {
            return false;
        };
        match self.doc.get_mut(id).map(|s| &mut s.kind) {
            Some(ShapeKind::Text { content, .. }) => {
                f(content);
                true
            }
            _ => false,
        }
    }

    /// Leave text edit focus. Non-empty text commits one snapshot; empty
    /// text is discarded without one.
    pub fn blur_text(&mut self) -> bool {
        let Some(id) = self.editing_text.take() else {
            return false;
        };
        let empty = match self.doc.get(id).map(|s| &s.kind) {
            Some(ShapeKind::Text { content, .. }) => content.trim().is_empty(),
            _ => return false,
        };
        if empty {
            self.doc.remove_shape(id);
            debug!(%id, "discarded empty text");
            return false;
        }
        if let Some(shape) = self.doc.get_mut(id) {
            shape.selectable = self.tool == Tool::Select;
        }
        debug!(%id, "text committed");
        self.commit();
        true
    }

    // ---- drag ----

    /// Abandon the current drag without touching history. A provisional
    /// shape is removed; a move drag restores the pre-drag document.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        match drag {
            DragSession::Pan { .. } => {}
            DragSession::Stroke { id, .. } | DragSession::Shape { id, .. } => {
                self.doc.remove_shape(id);
            }
            DragSession::Move { before, .. } => {
                self.doc = *before;
            }
        }
        debug!("drag cancelled");
        true
    }

    // ---- keyboard ----

    /// Route a key press. While text has edit focus keys go to the text and
    /// shortcuts are suppressed.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        if self.editing_text.is_some() {
            return match input.key {
                Key::Escape => {
                    self.blur_text();
                    true
                }
                Key::Enter => self.push_text('\n'),
                Key::Backspace => self.backspace_text(),
                Key::Char(_) if input.modifiers.command() => false,
                Key::Char(c) => self.push_text(c),
                Key::Delete => false,
            };
        }
        let Some(command) = command_for(input) else {
            return false;
        };
        debug!(?command, "shortcut");
        match command {
            Command::SetTool(tool) => {
                self.set_tool(tool);
                true
            }
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Duplicate => !self.duplicate_selected().is_empty(),
            Command::SelectAll => {
                self.select_all();
                true
            }
            Command::DeleteSelection => self.delete_selected(),
            Command::CancelDrag => self.cancel_drag(),
        }
    }
}
