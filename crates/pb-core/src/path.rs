//! Path resolver: locate a node by id and address it by index path.
//!
//! A path is the list of child indices from a root to a node: `[2]` is the
//! third root, `[2, 0]` its first child. The parent of any node is addressed
//! by its path minus the last index, and the empty path addresses the
//! forest's root sequence itself.
//!
//! Lookups are a plain depth-first search. Paths go stale after any
//! structural change, so callers re-resolve by id instead of holding on to
//! one across mutations.

use crate::id::NodeId;
use crate::model::{Forest, Node};
use smallvec::SmallVec;

/// Index path from a root to a node.
pub type NodePath = SmallVec<[usize; 8]>;

/// A resolved node together with its path.
#[derive(Debug, Clone)]
pub struct Located<'a> {
    pub path: NodePath,
    pub node: &'a Node,
}

impl Located<'_> {
    /// Path of the parent; empty for a root.
    pub fn parent_path(&self) -> &[usize] {
        &self.path[..self.path.len() - 1]
    }

    /// Position among its siblings.
    pub fn index(&self) -> usize {
        self.path[self.path.len() - 1]
    }

    pub fn is_root(&self) -> bool {
        self.path.len() == 1
    }
}

/// Find `id`, returning its path and a reference to it.
pub fn find(forest: &Forest, id: NodeId) -> Option<Located<'_>> {
    let mut path = NodePath::new();
    let node = search(&forest.roots, id, &mut path)?;
    Some(Located { path, node })
}

fn search<'a>(nodes: &'a [Node], id: NodeId, path: &mut NodePath) -> Option<&'a Node> {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = search(&node.children, id, path) {
            return Some(found);
        }
        path.pop();
    }
    None
}

pub fn find_path(forest: &Forest, id: NodeId) -> Option<NodePath> {
    find(forest, id).map(|loc| loc.path)
}

pub fn find_mut(forest: &mut Forest, id: NodeId) -> Option<&mut Node> {
    let path = find_path(forest, id)?;
    node_at_mut(forest, &path)
}

pub fn contains(forest: &Forest, id: NodeId) -> bool {
    find(forest, id).is_some()
}

pub fn node_at<'a>(forest: &'a Forest, path: &[usize]) -> Option<&'a Node> {
    let (first, rest) = path.split_first()?;
    let mut node = forest.roots.get(*first)?;
    for &i in rest {
        node = node.children.get(i)?;
    }
    Some(node)
}

pub fn node_at_mut<'a>(forest: &'a mut Forest, path: &[usize]) -> Option<&'a mut Node> {
    let (first, rest) = path.split_first()?;
    let mut node = forest.roots.get_mut(*first)?;
    for &i in rest {
        node = node.children.get_mut(i)?;
    }
    Some(node)
}

/// The sibling sequence addressed by `parent_path`: the root sequence for an
/// empty path, otherwise that node's children.
pub fn siblings_at_mut<'a>(forest: &'a mut Forest, parent_path: &[usize]) -> Option<&'a mut Vec<Node>> {
    if parent_path.is_empty() {
        return Some(&mut forest.roots);
    }
    node_at_mut(forest, parent_path).map(|n| &mut n.children)
}

/// Parent id of `id`: `None` if `id` is unknown, `Some(None)` for a root.
pub fn parent_of(forest: &Forest, id: NodeId) -> Option<Option<NodeId>> {
    let loc = find(forest, id)?;
    if loc.is_root() {
        return Some(None);
    }
    node_at(forest, loc.parent_path()).map(|p| Some(p.id))
}

/// Ancestors of `id`, root first, excluding `id` itself.
pub fn ancestors(forest: &Forest, id: NodeId) -> Option<Vec<NodeId>> {
    let loc = find(forest, id)?;
    let path = loc.parent_path();
    let mut out = Vec::with_capacity(path.len());
    for depth in 1..=path.len() {
        out.push(node_at(forest, &path[..depth])?.id);
    }
    Some(out)
}

/// Whether `id` lies strictly below `ancestor`.
pub fn is_descendant(forest: &Forest, ancestor: NodeId, id: NodeId) -> bool {
    ancestors(forest, id).is_some_and(|chain| chain.contains(&ancestor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeContent, NodeKind};
    use pretty_assertions::assert_eq;

    fn node(name: &str, kind: NodeKind) -> Node {
        Node::with_content(NodeId::intern(name), NodeContent::default_for(kind))
    }

    fn sample() -> Forest {
        Forest::from_roots(vec![
            node("p_header", NodeKind::Section),
            node("p_main", NodeKind::Section).with_child(
                node("p_wrap", NodeKind::Container)
                    .with_child(node("p_title", NodeKind::Heading))
                    .with_child(node("p_cta", NodeKind::Button)),
            ),
        ])
    }

    #[test]
    fn finds_nested_path() {
        let forest = sample();
        let loc = find(&forest, NodeId::intern("p_cta")).unwrap();
        assert_eq!(loc.path.as_slice(), &[1, 0, 1]);
        assert_eq!(loc.parent_path(), &[1, 0]);
        assert_eq!(loc.index(), 1);
        assert_eq!(loc.node.kind(), NodeKind::Button);
    }

    #[test]
    fn unknown_id_is_none() {
        let forest = sample();
        assert!(find(&forest, NodeId::intern("p_missing")).is_none());
        assert!(parent_of(&forest, NodeId::intern("p_missing")).is_none());
    }

    #[test]
    fn parent_and_ancestors() {
        let forest = sample();
        assert_eq!(parent_of(&forest, NodeId::intern("p_header")), Some(None));
        assert_eq!(
            parent_of(&forest, NodeId::intern("p_title")),
            Some(Some(NodeId::intern("p_wrap")))
        );
        assert_eq!(
            ancestors(&forest, NodeId::intern("p_title")),
            Some(vec![NodeId::intern("p_main"), NodeId::intern("p_wrap")])
        );
        assert!(is_descendant(&forest, NodeId::intern("p_main"), NodeId::intern("p_cta")));
        assert!(!is_descendant(&forest, NodeId::intern("p_cta"), NodeId::intern("p_cta")));
        assert!(!is_descendant(&forest, NodeId::intern("p_header"), NodeId::intern("p_cta")));
    }

    #[test]
    fn siblings_of_empty_path_are_roots() {
        let mut forest = sample();
        assert_eq!(siblings_at_mut(&mut forest, &[]).map(|s| s.len()), Some(2));
        assert_eq!(siblings_at_mut(&mut forest, &[1, 0]).map(|s| s.len()), Some(2));
        assert!(siblings_at_mut(&mut forest, &[7]).is_none());
    }

    #[test]
    fn find_mut_edits_in_place() {
        let mut forest = sample();
        let n = find_mut(&mut forest, NodeId::intern("p_title")).unwrap();
        n.content = NodeContent::Heading {
            text: "Hello".into(),
            level: 1,
        };
        let loc = find(&forest, NodeId::intern("p_title")).unwrap();
        assert!(matches!(&loc.node.content, NodeContent::Heading { level: 1, .. }));
    }
}
