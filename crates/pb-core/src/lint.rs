//! Lint diagnostics for page documents.
//!
//! Reports structural invariant violations (errors) and content problems
//! (warnings/info) without modifying the forest. The persistence loader
//! refuses documents with any `Error`; editor panels surface the rest.

use crate::id::NodeId;
use crate::model::{Forest, Node, NodeContent};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Informational.
    Info,
    /// Likely a mistake in the page content.
    Warning,
    /// The tree itself is inconsistent.
    Error,
}

/// A single lint diagnostic for a node.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to.
    pub node_id: NodeId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "missing-src").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all lint rules over the forest and return diagnostics.
#[must_use]
pub fn lint_forest(forest: &Forest) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(forest, &mut diags);
    for root in &forest.roots {
        lint_structure(root, None, &mut diags);
    }
    lint_parent_cycles(forest, &mut diags);
    lint_content(forest, &mut diags);
    diags
}

/// True if no diagnostic is an `Error`.
pub fn is_consistent(diags: &[LintDiagnostic]) -> bool {
    diags.iter().all(|d| d.severity < LintSeverity::Error)
}

// ─── Rules ───────────────────────────────────────────────────────────────

fn lint_duplicate_ids(forest: &Forest, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for node in forest.iter() {
        if !seen.insert(node.id) {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Id `{}` is used by more than one node.", node.id.as_str()),
                severity: LintSeverity::Error,
                rule: "duplicate-id",
            });
        }
    }
}

/// Back-references must match ownership, and only containers own children.
fn lint_structure(node: &Node, owner: Option<NodeId>, diags: &mut Vec<LintDiagnostic>) {
    if node.parent != owner {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!(
                "`{}` points at parent {:?} but is owned by {:?}.",
                node.id.as_str(),
                node.parent,
                owner
            ),
            severity: LintSeverity::Error,
            rule: "parent-mismatch",
        });
    }
    if !node.children.is_empty() && !node.accepts_children() {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!(
                "{:?} `{}` cannot contain children but has {}.",
                node.kind(),
                node.id.as_str(),
                node.children.len()
            ),
            severity: LintSeverity::Error,
            rule: "leaf-children",
        });
    }
    for child in &node.children {
        lint_structure(child, Some(node.id), diags);
    }
}

/// Follow `parent` back-references as graph edges; any strongly connected
/// component larger than one node (or a self-loop) is a cycle.
fn lint_parent_cycles(forest: &Forest, diags: &mut Vec<LintDiagnostic>) {
    let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
    for node in forest.iter() {
        index.entry(node.id).or_insert_with(|| graph.add_node(node.id));
    }
    for node in forest.iter() {
        if let Some(parent) = node.parent
            && let Some(&p) = index.get(&parent)
        {
            graph.update_edge(index[&node.id], p, ());
        }
    }

    for component in tarjan_scc(&graph) {
        let cyclic = component.len() > 1
            || component
                .first()
                .is_some_and(|&n| graph.find_edge(n, n).is_some());
        if !cyclic {
            continue;
        }
        for idx in component {
            let id = graph[idx];
            diags.push(LintDiagnostic {
                node_id: id,
                message: format!("`{}` is its own ancestor through parent links.", id.as_str()),
                severity: LintSeverity::Error,
                rule: "parent-cycle",
            });
        }
    }
}

fn lint_content(forest: &Forest, diags: &mut Vec<LintDiagnostic>) {
    for node in forest.iter() {
        let mut report = |severity, rule, message: String| {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message,
                severity,
                rule,
            });
        };

        if let NodeContent::Image { src, .. } | NodeContent::Video { src, .. } = &node.content
            && src.trim().is_empty()
        {
            report(
                LintSeverity::Warning,
                "missing-src",
                format!("{:?} `{}` has no source.", node.kind(), node.id.as_str()),
            );
        }

        if let NodeContent::Image { alt, .. } = &node.content
            && alt.trim().is_empty()
        {
            report(
                LintSeverity::Info,
                "missing-alt",
                format!("Image `{}` has no alt text.", node.id.as_str()),
            );
        }

        if let NodeContent::Heading { text, .. } | NodeContent::Paragraph { text } | NodeContent::Button { text, .. } =
            &node.content
            && text.trim().is_empty()
        {
            report(
                LintSeverity::Warning,
                "empty-text",
                format!("{:?} `{}` has no text.", node.kind(), node.id.as_str()),
            );
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
