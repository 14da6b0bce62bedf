//! Structural and property edits on a [`Document`].
//!
//! Each function either applies completely and returns `Ok`, or returns an
//! [`EditError`] with the document untouched. Targets are always re-resolved
//! by id on entry; no path is kept from one call to the next.
//!
//! These are the raw operations. [`Editor`](crate::Editor) wraps them with
//! history, clipboard, and session state.

use crate::drag::DropPosition;
use crate::errors::{EditError, EditResult};
use pb_core::path::{self, NodePath};
use pb_core::{Breakpoint, ContentPatch, Document, Forest, Node, NodeId, NodeKind, StyleMap};

// ─── Attach / detach ─────────────────────────────────────────────────────

/// The sibling sequence a node attached under `parent` joins. Rejects
/// parents that do not accept children.
fn children_mut(forest: &mut Forest, parent: Option<NodeId>) -> EditResult<&mut Vec<Node>> {
    let Some(pid) = parent else {
        return Ok(&mut forest.roots);
    };
    let p = path::find_mut(forest, pid).ok_or(EditError::NotFound(pid))?;
    if !p.accepts_children() {
        return Err(EditError::illegal(format!(
            "{} {pid} does not accept children",
            p.kind().as_str()
        )));
    }
    Ok(&mut p.children)
}

/// Insert `node` at `index` (clamped to the end), fixing its back-references.
fn place(siblings: &mut Vec<Node>, mut node: Node, parent: Option<NodeId>, index: Option<usize>) -> NodeId {
    let id = node.id;
    node.parent = parent;
    node.relink();
    let at = index.map_or(siblings.len(), |i| i.min(siblings.len()));
    siblings.insert(at, node);
    id
}

/// Attach a detached subtree under `parent` (or as a root) at `index`.
pub(crate) fn attach(
    forest: &mut Forest,
    node: Node,
    parent: Option<NodeId>,
    index: Option<usize>,
) -> EditResult<NodeId> {
    let siblings = children_mut(forest, parent)?;
    Ok(place(siblings, node, parent, index))
}

/// Remove `id` from its sibling sequence, returning it and where it was.
fn detach(forest: &mut Forest, id: NodeId) -> EditResult<(Node, NodePath)> {
    let at = path::find_path(forest, id).ok_or(EditError::NotFound(id))?;
    let (index, parent_path) = at.split_last().ok_or(EditError::NotFound(id))?;
    let siblings = path::siblings_at_mut(forest, parent_path).ok_or(EditError::NotFound(id))?;
    let node = siblings.remove(*index);
    Ok((node, at))
}

/// Put a detached node back exactly where [`detach`] found it.
fn reattach(forest: &mut Forest, node: Node, at: &NodePath) {
    if let Some((index, parent_path)) = at.split_last()
        && let Some(siblings) = path::siblings_at_mut(forest, parent_path)
    {
        siblings.insert(*index, node);
    }
}

/// Resolve `target` + `position` to the (parent, index) an insert should use.
pub(crate) fn drop_slot(
    forest: &Forest,
    target: NodeId,
    position: DropPosition,
) -> EditResult<(Option<NodeId>, Option<usize>)> {
    let loc = path::find(forest, target).ok_or(EditError::NotFound(target))?;
    match position {
        DropPosition::Inside => Ok((Some(target), None)),
        DropPosition::Before | DropPosition::After => {
            let parent = path::node_at(forest, loc.parent_path()).map(|p| p.id);
            let offset = usize::from(position == DropPosition::After);
            Ok((parent, Some(loc.index() + offset)))
        }
    }
}

// ─── Creation ────────────────────────────────────────────────────────────

/// Insert a new default node of `kind`.
pub fn insert(
    doc: &mut Document,
    kind: NodeKind,
    parent: Option<NodeId>,
    index: Option<usize>,
) -> EditResult<NodeId> {
    attach(&mut doc.forest, Node::new(kind), parent, index)
}

/// Insert a fresh-id clone of `template` (a blueprint subtree).
pub fn insert_template(
    doc: &mut Document,
    template: &Node,
    parent: Option<NodeId>,
    index: Option<usize>,
) -> EditResult<NodeId> {
    attach(&mut doc.forest, template.clone_fresh(), parent, index)
}

/// Deep-clone `id` with fresh ids and insert the copy right after it.
pub fn duplicate(doc: &mut Document, id: NodeId) -> EditResult<NodeId> {
    let loc = path::find(&doc.forest, id).ok_or(EditError::NotFound(id))?;
    let mut copy = loc.node.clone_fresh();
    copy.parent = path::node_at(&doc.forest, loc.parent_path()).map(|p| p.id);
    let copy_id = copy.id;
    let index = loc.index();
    let parent_path: NodePath = loc.parent_path().into();

    let siblings = path::siblings_at_mut(&mut doc.forest, &parent_path).ok_or(EditError::NotFound(id))?;
    siblings.insert(index + 1, copy);
    Ok(copy_id)
}

// ─── Removal & structure ─────────────────────────────────────────────────

/// Remove `id` and its subtree. Clears the selection if it was inside.
pub fn delete(doc: &mut Document, id: NodeId) -> EditResult<Node> {
    let (removed, _) = detach(&mut doc.forest, id)?;
    if let Some(selected) = doc.selected
        && removed.iter().any(|n| n.id == selected)
    {
        doc.selected = None;
    }
    Ok(removed)
}

/// Move `dragged` before, after, or inside `target`.
///
/// The dragged subtree is detached first and the target resolved afterwards,
/// so a target inside the dragged subtree simply no longer resolves and the
/// move is refused with everything put back.
pub fn move_node(
    doc: &mut Document,
    dragged: NodeId,
    target: NodeId,
    position: DropPosition,
) -> EditResult<()> {
    if dragged == target {
        return Err(EditError::illegal(format!("cannot move {dragged} relative to itself")));
    }
    let forest = &mut doc.forest;
    let (node, origin) = detach(forest, dragged)?;

    if !path::contains(forest, target) {
        let err = if node.iter().any(|n| n.id == target) {
            EditError::illegal(format!("{dragged} cannot be moved into its own subtree"))
        } else {
            EditError::NotFound(target)
        };
        reattach(forest, node, &origin);
        return Err(err);
    }

    let (parent, index) = match drop_slot(forest, target, position) {
        Ok(slot) => slot,
        Err(e) => {
            reattach(forest, node, &origin);
            return Err(e);
        }
    };
    match children_mut(forest, parent) {
        Ok(siblings) => {
            place(siblings, node, parent, index);
            Ok(())
        }
        Err(e) => {
            reattach(forest, node, &origin);
            Err(e)
        }
    }
}

/// Swap `id` with its neighbour towards the back (`forward`) or the front.
/// At either end this is a no-op.
fn shift(doc: &mut Document, id: NodeId, forward: bool) -> EditResult<()> {
    let at = path::find_path(&doc.forest, id).ok_or(EditError::NotFound(id))?;
    let (index, parent_path) = at.split_last().ok_or(EditError::NotFound(id))?;
    let siblings = path::siblings_at_mut(&mut doc.forest, parent_path).ok_or(EditError::NotFound(id))?;
    let index = *index;
    if forward && index + 1 < siblings.len() {
        siblings.swap(index, index + 1);
    } else if !forward && index > 0 {
        siblings.swap(index, index - 1);
    }
    Ok(())
}

pub fn move_up(doc: &mut Document, id: NodeId) -> EditResult<()> {
    shift(doc, id, false)
}

pub fn move_down(doc: &mut Document, id: NodeId) -> EditResult<()> {
    shift(doc, id, true)
}

// ─── Properties & style ──────────────────────────────────────────────────

fn node_mut(doc: &mut Document, id: NodeId) -> EditResult<&mut Node> {
    path::find_mut(&mut doc.forest, id).ok_or(EditError::NotFound(id))
}

/// Shallow-merge `patch` into the node's content.
pub fn update_props(doc: &mut Document, id: NodeId, patch: &ContentPatch) -> EditResult<()> {
    let node = node_mut(doc, id)?;
    node.content = node.content.merged(patch)?;
    Ok(())
}

/// Shallow-merge `partial` into the style record for `bp`, creating it if absent.
pub fn update_style(doc: &mut Document, id: NodeId, partial: &StyleMap, bp: Breakpoint) -> EditResult<()> {
    node_mut(doc, id)?.style.merge(bp, partial);
    Ok(())
}

pub fn update_hover_style(doc: &mut Document, id: NodeId, partial: &StyleMap) -> EditResult<()> {
    node_mut(doc, id)?.style.merge_hover(partial);
    Ok(())
}

pub fn clear_hover_style(doc: &mut Document, id: NodeId) -> EditResult<()> {
    node_mut(doc, id)?.style.hover = None;
    Ok(())
}

/// Drop a tablet/mobile override, or empty the desktop record.
pub fn reset_style(doc: &mut Document, id: NodeId, bp: Breakpoint) -> EditResult<()> {
    node_mut(doc, id)?.style.reset(bp);
    Ok(())
}

pub fn set_visibility(doc: &mut Document, id: NodeId, bp: Breakpoint, visible: bool) -> EditResult<()> {
    node_mut(doc, id)?.visibility.set_visible(bp, visible);
    Ok(())
}

// ─── Selection ───────────────────────────────────────────────────────────

pub fn select(doc: &mut Document, id: NodeId) -> EditResult<()> {
    if !path::contains(&doc.forest, id) {
        return Err(EditError::NotFound(id));
    }
    doc.selected = Some(id);
    Ok(())
}
