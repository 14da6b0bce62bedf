//! The editing session: one document, its history, the clipboard, and the
//! transient view state (active breakpoint, hovered node).
//!
//! Every structural or property edit goes through [`Editor::commit`], which
//! snapshots the document, runs the raw operation from [`mutations`], and
//! either records one history entry or restores the snapshot. Callers never
//! observe a half-applied change.

use crate::clipboard::{self, Clipboard};
use crate::config::EditorConfig;
use crate::drag::{DragSource, DropIntent, DropPosition};
use crate::errors::{EditError, EditResult};
use crate::history::History;
use crate::mutations;
use crate::shortcuts::ShortcutAction;
use pb_core::{
    Blueprint, Breakpoint, ContentPatch, Document, Forest, Node, NodeId, NodeKind, StyleMap,
    StyleState, path, resolve_style_state,
};

pub struct Editor {
    doc: Document,
    history: History,
    clipboard: Option<Clipboard>,
    breakpoint: Breakpoint,
    hovered: Option<NodeId>,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// An empty session.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::default(), config)
    }

    /// A session over an existing document (e.g. one restored from disk).
    /// Parent links are re-derived and a dangling selection is dropped.
    pub fn with_document(mut doc: Document, config: EditorConfig) -> Self {
        doc.normalize();
        Self {
            doc,
            history: History::new(config.history_limit),
            clipboard: None,
            breakpoint: config.initial_breakpoint,
            hovered: None,
            config,
        }
    }

    /// Replace the document wholesale. History is cleared; the clipboard
    /// survives. Normalized the same way as [`Editor::with_document`].
    pub fn load(&mut self, mut doc: Document) {
        log::debug!("loading document with {} node(s)", doc.forest.len());
        doc.normalize();
        self.doc = doc;
        self.history.clear();
        self.hovered = None;
    }

    // ─── Commit ──────────────────────────────────────────────────────────

    /// Run `op` against the document as one undoable step.
    ///
    /// On `Err` the document is restored to exactly what it was.
    fn commit<T>(&mut self, label: &str, op: impl FnOnce(&mut Document) -> EditResult<T>) -> EditResult<T> {
        let before = self.doc.clone();
        match op(&mut self.doc) {
            Ok(value) => {
                if self.history.record(before, &self.doc, label) {
                    log::debug!("{label}: committed ({} undo step(s))", self.history.undo_len());
                }
                self.drop_stale_hover();
                Ok(value)
            }
            Err(e) => {
                log::warn!("{label}: rejected: {e}");
                self.doc = before;
                Err(e)
            }
        }
    }

    /// Commit an edit that creates a node, selecting it if configured to.
    fn commit_created(
        &mut self,
        label: &str,
        op: impl FnOnce(&mut Document) -> EditResult<NodeId>,
    ) -> EditResult<NodeId> {
        let select = self.config.select_on_insert;
        self.commit(label, |doc| {
            let id = op(doc)?;
            if select {
                doc.selected = Some(id);
            }
            Ok(id)
        })
    }

    fn drop_stale_hover(&mut self) {
        if let Some(id) = self.hovered
            && !path::contains(&self.doc.forest, id)
        {
            self.hovered = None;
        }
    }

    // ─── Creation ────────────────────────────────────────────────────────

    pub fn insert(&mut self, kind: NodeKind, parent: Option<NodeId>, index: Option<usize>) -> EditResult<NodeId> {
        self.commit_created(&format!("insert {}", kind.as_str()), |doc| {
            mutations::insert(doc, kind, parent, index)
        })
    }

    /// Insert a fresh-id clone of a template subtree.
    pub fn insert_template(
        &mut self,
        template: &Node,
        parent: Option<NodeId>,
        index: Option<usize>,
    ) -> EditResult<NodeId> {
        self.commit_created("insert template", |doc| {
            mutations::insert_template(doc, template, parent, index)
        })
    }

    pub fn insert_blueprint(
        &mut self,
        blueprint: &Blueprint,
        parent: Option<NodeId>,
        index: Option<usize>,
    ) -> EditResult<NodeId> {
        self.commit_created(&format!("insert {}", blueprint.name), |doc| {
            mutations::insert_template(doc, &blueprint.root, parent, index)
        })
    }

    pub fn duplicate(&mut self, id: NodeId) -> EditResult<NodeId> {
        self.commit_created("duplicate", |doc| mutations::duplicate(doc, id))
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Remove `id` and its subtree, returning the removed subtree.
    pub fn delete(&mut self, id: NodeId) -> EditResult<Node> {
        self.commit("delete", |doc| mutations::delete(doc, id))
    }

    pub fn move_node(&mut self, dragged: NodeId, target: NodeId, position: DropPosition) -> EditResult<()> {
        self.commit("move", |doc| mutations::move_node(doc, dragged, target, position))
    }

    pub fn move_up(&mut self, id: NodeId) -> EditResult<()> {
        self.commit("move up", |doc| mutations::move_up(doc, id))
    }

    pub fn move_down(&mut self, id: NodeId) -> EditResult<()> {
        self.commit("move down", |doc| mutations::move_down(doc, id))
    }

    /// Commit a released drag.
    ///
    /// `Before`/`After` act on the target's parent at the target's index (or
    /// one past it); `Inside` acts on the target itself.
    pub fn apply_drop(&mut self, intent: DropIntent) -> EditResult<Option<NodeId>> {
        let DropIntent {
            source,
            target,
            position,
        } = intent;
        let created = match source {
            DragSource::Existing(dragged) => {
                self.move_node(dragged, target, position)?;
                return Ok(None);
            }
            DragSource::Palette(kind) => {
                let (parent, index) = mutations::drop_slot(&self.doc.forest, target, position)?;
                self.insert(kind, parent, index)?
            }
            DragSource::Template(root) => {
                let (parent, index) = mutations::drop_slot(&self.doc.forest, target, position)?;
                self.insert_template(&root, parent, index)?
            }
        };
        Ok(Some(created))
    }

    // ─── Properties & style ──────────────────────────────────────────────

    pub fn update_props(&mut self, id: NodeId, patch: &ContentPatch) -> EditResult<()> {
        self.commit("edit content", |doc| mutations::update_props(doc, id, patch))
    }

    /// Merge `partial` into the style record of `bp`.
    pub fn update_style(&mut self, id: NodeId, partial: &StyleMap, bp: Breakpoint) -> EditResult<()> {
        self.commit(&format!("edit {} style", bp.as_str()), |doc| {
            mutations::update_style(doc, id, partial, bp)
        })
    }

    pub fn update_hover_style(&mut self, id: NodeId, partial: &StyleMap) -> EditResult<()> {
        self.commit("edit hover style", |doc| mutations::update_hover_style(doc, id, partial))
    }

    pub fn clear_hover_style(&mut self, id: NodeId) -> EditResult<()> {
        self.commit("clear hover style", |doc| mutations::clear_hover_style(doc, id))
    }

    pub fn reset_style(&mut self, id: NodeId, bp: Breakpoint) -> EditResult<()> {
        self.commit(&format!("reset {} style", bp.as_str()), |doc| {
            mutations::reset_style(doc, id, bp)
        })
    }

    pub fn set_visibility(&mut self, id: NodeId, bp: Breakpoint, visible: bool) -> EditResult<()> {
        self.commit("visibility", |doc| mutations::set_visibility(doc, id, bp, visible))
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    pub fn copy_style(&mut self, id: NodeId) -> EditResult<()> {
        self.clipboard = Some(clipboard::copy_style(&self.doc, id)?);
        Ok(())
    }

    pub fn copy_component(&mut self, id: NodeId) -> EditResult<()> {
        self.clipboard = Some(clipboard::copy_component(&self.doc, id)?);
        Ok(())
    }

    /// Merge the clipboard style into `id` at the active breakpoint.
    pub fn paste_style(&mut self, id: NodeId) -> EditResult<()> {
        let clip = self.clipboard.take();
        let bp = self.breakpoint;
        let result = self.commit("paste style", |doc| {
            clipboard::paste_style(doc, id, clip.as_ref(), bp)
        });
        self.clipboard = clip;
        result
    }

    pub fn paste_component(&mut self, parent: Option<NodeId>, index: Option<usize>) -> EditResult<NodeId> {
        let clip = self.clipboard.take();
        let result = self.commit_created("paste", |doc| {
            clipboard::paste_component(doc, clip.as_ref(), parent, index)
        });
        self.clipboard = clip;
        result
    }

    pub fn can_paste_component(&self) -> bool {
        matches!(self.clipboard, Some(Clipboard::Component(_)))
    }

    pub fn can_paste_style(&self) -> bool {
        matches!(self.clipboard, Some(Clipboard::Styles(_)))
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    // ─── Selection & view state ──────────────────────────────────────────

    /// Select `id`. Not an undo step of its own.
    pub fn select(&mut self, id: NodeId) -> EditResult<()> {
        mutations::select(&mut self.doc, id)
    }

    pub fn clear_selection(&mut self) {
        self.doc.selected = None;
    }

    pub fn set_breakpoint(&mut self, bp: Breakpoint) {
        self.breakpoint = bp;
    }

    pub fn active_breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Mark the node under the pointer; unknown ids clear it.
    pub fn set_hovered(&mut self, id: Option<NodeId>) {
        self.hovered = id.filter(|id| path::contains(&self.doc.forest, *id));
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Option<String> {
        let label = self.history.undo(&mut self.doc)?;
        log::debug!("undo: {label}");
        self.drop_stale_hover();
        Some(label)
    }

    pub fn redo(&mut self) -> Option<String> {
        let label = self.history.redo(&mut self.doc)?;
        log::debug!("redo: {label}");
        self.drop_stale_hover();
        Some(label)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn begin_batch(&mut self, label: &str) {
        self.history.begin_batch(&self.doc, label);
    }

    /// Close a batch opened with [`begin_batch`](Self::begin_batch). Returns
    /// whether an undo step was written.
    pub fn end_batch(&mut self) -> bool {
        self.history.end_batch(&self.doc)
    }

    /// Run `f` as one undo step. If `f` fails, everything it did is rolled
    /// back and nothing is recorded.
    pub fn batch<T>(&mut self, label: &str, f: impl FnOnce(&mut Self) -> EditResult<T>) -> EditResult<T> {
        let before = self.doc.clone();
        self.begin_batch(label);
        let result = f(self);
        if result.is_err() {
            self.doc = before;
            self.drop_stale_hover();
        }
        self.end_batch();
        result
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn forest(&self) -> &Forest {
        &self.doc.forest
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.doc.selected
    }

    pub fn selected_node(&self) -> Option<&Node> {
        let id = self.doc.selected?;
        path::find(&self.doc.forest, id).map(|loc| loc.node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        path::find(&self.doc.forest, id).map(|loc| loc.node)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Effective style of `id` at the active breakpoint, with the hover
    /// overlay applied when `id` is the hovered node.
    pub fn resolved_style(&self, id: NodeId) -> Option<StyleMap> {
        let node = self.node(id)?;
        let state = if self.hovered == Some(id) {
            StyleState::Hover
        } else {
            StyleState::Normal
        };
        Some(resolve_style_state(&node.style, self.breakpoint, state))
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    fn require_selection(&self) -> EditResult<NodeId> {
        self.doc
            .selected
            .ok_or_else(|| EditError::illegal("no node is selected"))
    }

    /// Where a paste lands: inside the selected container, else right after
    /// the selected node, else at the end of the root sequence.
    fn paste_slot(&self) -> (Option<NodeId>, Option<usize>) {
        let Some(node) = self.selected_node() else {
            return (None, None);
        };
        if node.accepts_children() {
            return (Some(node.id), None);
        }
        mutations::drop_slot(&self.doc.forest, node.id, DropPosition::After).unwrap_or((None, None))
    }

    /// Perform a shortcut against the current selection.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> EditResult<()> {
        log::trace!("shortcut {action:?}");
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Delete => {
                let id = self.require_selection()?;
                self.delete(id)?;
            }
            ShortcutAction::Duplicate => {
                let id = self.require_selection()?;
                self.duplicate(id)?;
            }
            ShortcutAction::Copy => {
                let id = self.require_selection()?;
                self.copy_component(id)?;
            }
            ShortcutAction::Cut => {
                let id = self.require_selection()?;
                self.copy_component(id)?;
                self.delete(id)?;
            }
            ShortcutAction::Paste => {
                let (parent, index) = self.paste_slot();
                self.paste_component(parent, index)?;
            }
            ShortcutAction::CopyStyle => {
                let id = self.require_selection()?;
                self.copy_style(id)?;
            }
            ShortcutAction::PasteStyle => {
                let id = self.require_selection()?;
                self.paste_style(id)?;
            }
            ShortcutAction::MoveUp => {
                let id = self.require_selection()?;
                self.move_up(id)?;
            }
            ShortcutAction::MoveDown => {
                let id = self.require_selection()?;
                self.move_down(id)?;
            }
            ShortcutAction::ShowDesktop => self.set_breakpoint(Breakpoint::Desktop),
            ShortcutAction::ShowTablet => self.set_breakpoint(Breakpoint::Tablet),
            ShortcutAction::ShowMobile => self.set_breakpoint(Breakpoint::Mobile),
            ShortcutAction::Deselect => self.clear_selection(),
        }
        Ok(())
    }
}
