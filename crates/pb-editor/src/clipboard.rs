//! Single-slot clipboard holding either a component subtree or a style.
//!
//! Copies are deep: later edits to the source never leak into the slot, and
//! pasting a component clones it again with fresh ids so the same clipboard
//! can be pasted any number of times.

use crate::errors::{EditError, EditResult};
use crate::mutations;
use pb_core::{Breakpoint, Document, Node, NodeId, NodeStyle, path, resolve_style};

#[derive(Debug, Clone, PartialEq)]
pub enum Clipboard {
    /// A detached subtree, ids untouched until paste.
    Component(Node),
    /// A node's full per-breakpoint style.
    Styles(NodeStyle),
}

impl Clipboard {
    pub fn tag(&self) -> &'static str {
        match self {
            Clipboard::Component(_) => "component",
            Clipboard::Styles(_) => "styles",
        }
    }
}

fn tag_of(clip: Option<&Clipboard>) -> &'static str {
    clip.map_or("nothing", Clipboard::tag)
}

pub fn copy_style(doc: &Document, id: NodeId) -> EditResult<Clipboard> {
    let loc = path::find(&doc.forest, id).ok_or(EditError::NotFound(id))?;
    Ok(Clipboard::Styles(loc.node.style.clone()))
}

pub fn copy_component(doc: &Document, id: NodeId) -> EditResult<Clipboard> {
    let loc = path::find(&doc.forest, id).ok_or(EditError::NotFound(id))?;
    let mut node = loc.node.clone();
    node.parent = None;
    Ok(Clipboard::Component(node))
}

/// Merge the copied style, as it looks at `bp`, into the target's `bp`
/// record. A copied hover overlay is merged into the target's hover record.
pub fn paste_style(doc: &mut Document, id: NodeId, clip: Option<&Clipboard>, bp: Breakpoint) -> EditResult<()> {
    let Some(Clipboard::Styles(style)) = clip else {
        return Err(EditError::ClipboardMismatch {
            expected: "styles",
            found: tag_of(clip),
        });
    };
    let node = path::find_mut(&mut doc.forest, id).ok_or(EditError::NotFound(id))?;
    node.style.merge(bp, &resolve_style(style, bp));
    if let Some(hover) = &style.hover {
        node.style.merge_hover(hover);
    }
    Ok(())
}

/// Attach a fresh-id copy of the clipboard component.
pub fn paste_component(
    doc: &mut Document,
    clip: Option<&Clipboard>,
    parent: Option<NodeId>,
    index: Option<usize>,
) -> EditResult<NodeId> {
    let Some(Clipboard::Component(node)) = clip else {
        return Err(EditError::ClipboardMismatch {
            expected: "component",
            found: tag_of(clip),
        });
    };
    mutations::attach(&mut doc.forest, node.clone_fresh(), parent, index)
}
