//! Integration tests: structural edits through the `Editor` (pb-editor).
//!
//! End-to-end scenarios: build a page, drag things around, copy and paste,
//! and check the forest stays consistent after every step.

use pb_core::{
    BlueprintLibrary, Breakpoint, ContentPatch, Document, Forest, NodeContent, NodeId, NodeKind, StyleValue,
    is_consistent, lint_forest, path, resolve_forest, style_map,
};
use pb_editor::{
    Bounds, DragSession, DragSource, DropPosition, EditError, Editor, EditorConfig, Modifiers, PointerSample,
    ShortcutMap, classify_drop,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn assert_consistent(forest: &Forest) {
    let diags = lint_forest(forest);
    assert!(is_consistent(&diags), "inconsistent forest: {diags:?}");
}

fn ids(forest: &Forest) -> Vec<NodeId> {
    forest.iter().map(|n| n.id).collect()
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn insert_select_delete_on_empty_forest() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ed = Editor::default();
    let section = ed.insert(NodeKind::Section, None, None).unwrap();

    assert_eq!(ed.forest().roots.len(), 1);
    assert_eq!(ed.forest().roots[0].kind(), NodeKind::Section);

    ed.select(section).unwrap();
    ed.delete(section).unwrap();
    assert!(ed.forest().is_empty());
    assert_eq!(ed.selected(), None);
}

#[test]
fn move_button_between_sibling_containers() {
    let mut ed = Editor::default();
    let a = ed.insert(NodeKind::Section, None, None).unwrap();
    let c1 = ed.insert(NodeKind::Container, Some(a), None).unwrap();
    let c2 = ed.insert(NodeKind::Container, Some(a), None).unwrap();
    let b = ed.insert(NodeKind::Button, Some(c1), None).unwrap();

    ed.move_node(b, c2, DropPosition::Inside).unwrap();

    assert!(ed.node(c1).unwrap().children.is_empty());
    let c2_node = ed.node(c2).unwrap();
    assert_eq!(c2_node.children.len(), 1);
    assert_eq!(c2_node.children[0].id, b);
    assert_eq!(ed.node(b).unwrap().parent, Some(c2));
    assert_consistent(ed.forest());
}

#[test]
fn drop_classification_against_box() {
    let target = Bounds::new(0.0, 100.0, 320.0, 40.0);
    assert_eq!(classify_drop(PointerSample::at(10.0, 110.0), target, true), DropPosition::Before);
    assert_eq!(classify_drop(PointerSample::at(10.0, 135.0), target, true), DropPosition::After);
    assert_eq!(
        classify_drop(PointerSample::over_body(10.0, 135.0), target, true),
        DropPosition::Inside
    );
}

#[test]
fn duplicate_is_isolated_from_original() {
    let mut ed = Editor::default();
    let section = ed.insert(NodeKind::Section, None, None).unwrap();
    let row = ed.insert(NodeKind::Row, Some(section), None).unwrap();
    let heading = ed.insert(NodeKind::Heading, Some(row), None).unwrap();

    let copy = ed.duplicate(row).unwrap();
    let original = ed.node(row).unwrap().clone();
    let clone = ed.node(copy).unwrap().clone();

    assert_eq!(clone.subtree_len(), original.subtree_len());
    assert_eq!(clone.children[0].content, original.children[0].content);
    let a: HashSet<_> = original.iter().map(|n| n.id).collect();
    let b: HashSet<_> = clone.iter().map(|n| n.id).collect();
    assert!(a.is_disjoint(&b));

    let mut patch = ContentPatch::new();
    patch.insert("text".into(), serde_json::json!("Only the copy"));
    ed.update_props(clone.children[0].id, &patch).unwrap();
    assert_eq!(ed.node(heading).unwrap().content, original.children[0].content);

    let siblings: Vec<_> = ed.node(section).unwrap().children.iter().map(|n| n.id).collect();
    assert_eq!(siblings, vec![row, copy]);
}

#[test]
fn move_into_descendant_leaves_forest_unchanged() {
    let mut ed = Editor::default();
    let outer = ed.insert(NodeKind::Section, None, None).unwrap();
    let inner = ed.insert(NodeKind::Container, Some(outer), None).unwrap();
    let deepest = ed.insert(NodeKind::Column, Some(inner), None).unwrap();
    let before = ed.document().clone();

    for target in [inner, deepest, outer] {
        let err = ed.move_node(outer, target, DropPosition::Inside).unwrap_err();
        assert!(matches!(err, EditError::IllegalStructure { .. }), "{err}");
        assert_eq!(ed.document(), &before);
    }
}

// ─── Drag sessions ──────────────────────────────────────────────────────

#[test]
fn dragging_existing_node_after_a_section() {
    let mut ed = Editor::default();
    let first = ed.insert(NodeKind::Section, None, None).unwrap();
    let second = ed.insert(NodeKind::Section, None, None).unwrap();
    let para = ed.insert(NodeKind::Paragraph, Some(first), None).unwrap();

    let mut drag = DragSession::begin(DragSource::Existing(para));
    let bounds = Bounds::new(0.0, 400.0, 800.0, 200.0);
    // Sections are containers, but the pointer is over a nested child here.
    assert_eq!(
        drag.hover(ed.forest(), second, bounds, PointerSample::at(40.0, 550.0)),
        Some(DropPosition::After)
    );
    ed.apply_drop(drag.release().unwrap()).unwrap();

    assert_eq!(ids_of_roots(&ed), vec![first, second, para]);
    assert_eq!(ed.node(para).unwrap().parent, None);
    assert_consistent(ed.forest());
}

fn ids_of_roots(ed: &Editor) -> Vec<NodeId> {
    ed.forest().roots.iter().map(|n| n.id).collect()
}

#[test]
fn aborted_drag_changes_nothing() {
    let mut ed = Editor::default();
    let section = ed.insert(NodeKind::Section, None, None).unwrap();
    let before = ed.document().clone();

    let mut drag = DragSession::begin(DragSource::Palette(NodeKind::Image));
    drag.hover(
        ed.forest(),
        section,
        Bounds::new(0.0, 0.0, 100.0, 100.0),
        PointerSample::over_body(50.0, 50.0),
    );
    drag.abort();
    assert_eq!(ed.document(), &before);
    assert_eq!(ed.history().undo_len(), 1);
}

#[test]
fn blueprint_from_library_is_inserted_with_fresh_ids() {
    let mut ed = Editor::default();
    let lib = BlueprintLibrary::builtin();
    let hero = lib.get("hero").unwrap();
    let a = ed.insert_blueprint(hero, None, None).unwrap();
    let b = ed.insert_blueprint(hero, None, Some(0)).unwrap();

    assert_eq!(ids_of_roots(&ed), vec![b, a]);
    let all = ids(ed.forest());
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(all.len(), unique.len());
    assert_eq!(all.len(), 2 * hero.root.subtree_len());
    assert_consistent(ed.forest());
}

// ─── Clipboard via shortcuts ────────────────────────────────────────────

#[test]
fn copy_paste_shortcuts_follow_selection() {
    let mut ed = Editor::default();
    let section = ed.insert(NodeKind::Section, None, None).unwrap();
    let container = ed.insert(NodeKind::Container, Some(section), None).unwrap();
    let button = ed.insert(NodeKind::Button, Some(container), None).unwrap();
    let cmd = Modifiers::cmd();

    ed.select(button).unwrap();
    let copy = ShortcutMap::resolve("c", cmd).unwrap();
    let paste = ShortcutMap::resolve("v", cmd).unwrap();
    ed.run_shortcut(copy).unwrap();

    // Selected leaf: paste lands right after it.
    ed.run_shortcut(paste).unwrap();
    let kids = &ed.node(container).unwrap().children;
    assert_eq!(kids.len(), 2);
    assert_eq!(kids[0].id, button);

    // Selected container: paste lands inside it, at the end.
    ed.select(section).unwrap();
    ed.run_shortcut(paste).unwrap();
    let kids = &ed.node(section).unwrap().children;
    assert_eq!(kids.len(), 2);
    assert_eq!(kids[1].kind(), NodeKind::Button);

    // Nothing selected: paste goes to the root sequence.
    ed.run_shortcut(ShortcutMap::resolve("Escape", Modifiers::NONE).unwrap()).unwrap();
    ed.run_shortcut(paste).unwrap();
    assert_eq!(ed.forest().roots.len(), 2);
    assert_consistent(ed.forest());
}

#[test]
fn shortcut_without_selection_is_rejected() {
    let mut ed = Editor::default();
    ed.insert(NodeKind::Section, None, None).unwrap();
    let before = ed.document().clone();
    let delete = ShortcutMap::resolve("Delete", Modifiers::NONE).unwrap();
    assert!(matches!(
        ed.run_shortcut(delete),
        Err(EditError::IllegalStructure { .. })
    ));
    assert_eq!(ed.document(), &before);
}

#[test]
fn style_copy_paste_at_breakpoint() {
    let mut ed = Editor::new(EditorConfig {
        initial_breakpoint: Breakpoint::Mobile,
        ..EditorConfig::default()
    });
    let src = ed.insert(NodeKind::Heading, None, None).unwrap();
    let dst = ed.insert(NodeKind::Paragraph, None, None).unwrap();
    ed.update_style(src, &style_map([("letterSpacing", 2)]), Breakpoint::Tablet)
        .unwrap();

    ed.copy_style(src).unwrap();
    ed.paste_style(dst).unwrap();

    let mobile = ed.node(dst).unwrap().style.mobile.clone().unwrap();
    // Inherited through tablet into the mobile view.
    assert_eq!(mobile.get("letterSpacing"), Some(&StyleValue::Number(2.0)));
    // Desktop heading values come along too, overriding the paragraph's own.
    assert_eq!(mobile.get("fontSize"), Some(&StyleValue::Number(32.0)));
    assert!(ed.node(dst).unwrap().style.tablet.is_none());
}

// ─── Persistence round trip ─────────────────────────────────────────────

#[test]
fn edited_document_survives_reload() {
    let mut ed = Editor::default();
    let section = ed.insert(NodeKind::Section, None, None).unwrap();
    let image = ed.insert(NodeKind::Image, Some(section), None).unwrap();
    let mut patch = ContentPatch::new();
    patch.insert("alt".into(), serde_json::json!("A mountain lake"));
    ed.update_props(image, &patch).unwrap();
    ed.set_visibility(image, Breakpoint::Mobile, false).unwrap();
    ed.select(image).unwrap();

    let bytes = ed.document().to_msgpack().unwrap();
    let restored = Document::from_msgpack(&bytes).unwrap();
    assert_eq!(&restored, ed.document());

    let mut reopened = Editor::default();
    reopened.load(restored);
    let node = reopened.selected_node().unwrap();
    assert!(matches!(&node.content, NodeContent::Image { alt, .. } if alt == "A mountain lake"));
    assert!(!node.is_visible(Breakpoint::Mobile));
    assert_eq!(path::parent_of(reopened.forest(), image), Some(Some(section)));

    let styles = resolve_forest(reopened.forest(), Breakpoint::Desktop);
    assert_eq!(styles.len(), 2);
}
