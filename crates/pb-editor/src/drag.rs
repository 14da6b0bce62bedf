//! Drag-and-drop: turning pointer geometry into a structural edit.
//!
//! While a drag is active the rendering layer reports, for whichever node
//! the pointer is over, the node's bounding box and whether the pointer is
//! over that node's own body (no nested child intercepted it first). The
//! session classifies each sample as before / after / inside without touching
//! the document. Only [`DragSession::release`] produces a [`DropIntent`],
//! which the editor commits as one insert or move.

use pb_core::{Forest, Node, NodeId, NodeKind, path};

/// Where a dropped node lands relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    /// Previous sibling of the target.
    Before,
    /// Next sibling of the target.
    After,
    /// Last child of the target (containers only).
    Inside,
}

/// On-screen bounding box of a node, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// A pointer position reported during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    /// The pointer is over the target's own body rather than a nested child.
    pub over_own_body: bool,
}

impl PointerSample {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            over_own_body: false,
        }
    }

    pub fn over_body(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            over_own_body: true,
        }
    }
}

/// Classify a pointer sample against a target.
///
/// A container whose own body is under the pointer takes the drop inside.
/// Otherwise the vertical midpoint decides: strictly above is `Before`, at
/// or below is `After`.
pub fn classify_drop(sample: PointerSample, bounds: Bounds, target_is_container: bool) -> DropPosition {
    if target_is_container && sample.over_own_body {
        DropPosition::Inside
    } else if sample.y < bounds.mid_y() {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}

// ─── Drag session ────────────────────────────────────────────────────────

/// What is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A new node of this kind from the palette.
    Palette(NodeKind),
    /// A template subtree (blueprint root); cloned with fresh ids on drop.
    Template(Box<Node>),
    /// An existing node being moved.
    Existing(NodeId),
}

/// A committed drop, ready for [`Editor::apply_drop`](crate::Editor::apply_drop).
#[derive(Debug, Clone, PartialEq)]
pub struct DropIntent {
    pub source: DragSource,
    pub target: NodeId,
    pub position: DropPosition,
}

/// The single active drag. Hover updates are pure; nothing is committed
/// until release.
#[derive(Debug, Clone)]
pub struct DragSession {
    source: DragSource,
    candidate: Option<(NodeId, DropPosition)>,
}

impl DragSession {
    pub fn begin(source: DragSource) -> Self {
        log::trace!("drag started: {source:?}");
        Self {
            source,
            candidate: None,
        }
    }

    pub fn source(&self) -> &DragSource {
        &self.source
    }

    /// Re-classify against the node under the pointer and remember the result.
    ///
    /// Returns `None` (and forgets any previous candidate) when the target is
    /// unknown, when the sample falls outside `bounds`, or when the target is
    /// the dragged node or lies inside it.
    pub fn hover(
        &mut self,
        forest: &Forest,
        target: NodeId,
        bounds: Bounds,
        sample: PointerSample,
    ) -> Option<DropPosition> {
        self.candidate = None;
        if !bounds.contains(sample.x, sample.y) {
            return None;
        }
        let located = path::find(forest, target)?;
        if let DragSource::Existing(dragged) = &self.source
            && (*dragged == target || path::is_descendant(forest, *dragged, target))
        {
            return None;
        }
        let position = classify_drop(sample, bounds, located.node.accepts_children());
        self.candidate = Some((target, position));
        Some(position)
    }

    /// The pointer left every drop target.
    pub fn leave(&mut self) {
        self.candidate = None;
    }

    pub fn candidate(&self) -> Option<(NodeId, DropPosition)> {
        self.candidate
    }

    /// End the drag over the current candidate. `None` if there is nowhere
    /// to drop, which the caller treats like an abort.
    pub fn release(self) -> Option<DropIntent> {
        let (target, position) = self.candidate?;
        Some(DropIntent {
            source: self.source,
            target,
            position,
        })
    }

    /// Cancel the drag. Nothing is committed.
    pub fn abort(self) {
        log::trace!("drag aborted");
    }
}
