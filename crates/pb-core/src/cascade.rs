//! Responsive style cascade.
//!
//! Effective style at a breakpoint is built by layering the stored records
//! base first: desktop, then tablet, then mobile, stopping at the requested
//! breakpoint. Later layers override earlier keys; keys they do not mention
//! are inherited. Hover is a separate overlay applied on top of the resolved
//! base only for the hover pseudo-state.
//!
//! Resolution is pure and, because records are ordered maps, produces the
//! same record (and the same CSS text) every time for the same input. Live
//! preview and export both go through here.

use crate::model::{Breakpoint, Forest, Node, NodeStyle, StyleMap, StyleValue};
use std::collections::BTreeMap;

/// Interactive pseudo-state a node is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleState {
    #[default]
    Normal,
    Hover,
}

fn overlay(dst: &mut StyleMap, src: &StyleMap) {
    for (k, v) in src {
        dst.insert(k.clone(), v.clone());
    }
}

/// Effective base style of `style` at `bp`.
pub fn resolve_style(style: &NodeStyle, bp: Breakpoint) -> StyleMap {
    let mut out = style.desktop.clone();
    for layer in &bp.cascade()[1..] {
        if let Some(record) = style.record(*layer) {
            overlay(&mut out, record);
        }
    }
    out
}

/// Effective style of `style` at `bp` in the given pseudo-state.
pub fn resolve_style_state(style: &NodeStyle, bp: Breakpoint, state: StyleState) -> StyleMap {
    let mut out = resolve_style(style, bp);
    if state == StyleState::Hover
        && let Some(hover) = &style.hover
    {
        overlay(&mut out, hover);
    }
    out
}

/// Effective style of every node in `forest` at `bp`, keyed by id string.
pub fn resolve_forest(forest: &Forest, bp: Breakpoint) -> BTreeMap<String, StyleMap> {
    forest
        .iter()
        .map(|n| (n.id.as_str().to_string(), resolve_style(&n.style, bp)))
        .collect()
}

/// Convenience: resolve a node's own style.
pub fn resolve_node(node: &Node, bp: Breakpoint) -> StyleMap {
    resolve_style(&node.style, bp)
}

// ─── CSS text ────────────────────────────────────────────────────────────

/// Properties whose numeric values carry no unit.
const UNITLESS: &[&str] = &[
    "flex",
    "flexGrow",
    "flexShrink",
    "fontWeight",
    "lineHeight",
    "opacity",
    "order",
    "zIndex",
];

/// `backgroundColor` -> `background-color`. Already-kebab names pass through.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Render a resolved record as CSS declarations, one per line, in key order.
/// Numbers get `px` unless the property is unitless.
pub fn to_css(style: &StyleMap) -> String {
    let mut out = String::new();
    for (name, value) in style {
        let property = kebab_case(name);
        match value {
            StyleValue::Number(n) if !UNITLESS.contains(&name.as_str()) && *n != 0.0 => {
                out.push_str(&format!("{property}: {n}px;\n"));
            }
            _ => out.push_str(&format!("{property}: {value};\n")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::style_map;
    use pretty_assertions::assert_eq;

    fn layered() -> NodeStyle {
        NodeStyle {
            desktop: style_map([
                ("fontSize", StyleValue::Number(32.0)),
                ("color", StyleValue::from("black")),
                ("padding", StyleValue::from("24px")),
            ]),
            tablet: Some(style_map([("fontSize", 24)])),
            mobile: Some(style_map([("padding", "8px")])),
            hover: Some(style_map([("color", "blue")])),
        }
    }

    #[test]
    fn desktop_ignores_overrides() {
        let resolved = resolve_style(&layered(), Breakpoint::Desktop);
        assert_eq!(resolved, layered().desktop);
    }

    #[test]
    fn tablet_overlays_desktop() {
        let resolved = resolve_style(&layered(), Breakpoint::Tablet);
        assert_eq!(
            resolved,
            style_map([
                ("fontSize", StyleValue::Number(24.0)),
                ("color", StyleValue::from("black")),
                ("padding", StyleValue::from("24px")),
            ])
        );
    }

    #[test]
    fn mobile_inherits_tablet_then_overrides() {
        let resolved = resolve_style(&layered(), Breakpoint::Mobile);
        assert_eq!(
            resolved,
            style_map([
                ("fontSize", StyleValue::Number(24.0)),
                ("color", StyleValue::from("black")),
                ("padding", StyleValue::from("8px")),
            ])
        );
    }

    #[test]
    fn mobile_without_tablet_falls_back_to_desktop() {
        let mut style = layered();
        style.tablet = None;
        let resolved = resolve_style(&style, Breakpoint::Mobile);
        assert_eq!(resolved.get("fontSize"), Some(&StyleValue::Number(32.0)));
        assert_eq!(resolved.get("padding"), Some(&StyleValue::from("8px")));
    }

    #[test]
    fn hover_is_separate_overlay() {
        let style = layered();
        assert_eq!(
            resolve_style(&style, Breakpoint::Desktop).get("color"),
            Some(&StyleValue::from("black"))
        );
        let hovered = resolve_style_state(&style, Breakpoint::Mobile, StyleState::Hover);
        assert_eq!(hovered.get("color"), Some(&StyleValue::from("blue")));
        assert_eq!(hovered.get("padding"), Some(&StyleValue::from("8px")));
    }

    #[test]
    fn css_output_is_stable() {
        let style = resolve_style(&layered(), Breakpoint::Tablet);
        let css = to_css(&style);
        assert_eq!(css, "color: black;\nfont-size: 24px;\npadding: 24px;\n");
        assert_eq!(css, to_css(&resolve_style(&layered(), Breakpoint::Tablet)));
    }

    #[test]
    fn unitless_numbers_have_no_px() {
        let css = to_css(&style_map([
            ("fontWeight", StyleValue::Number(700.0)),
            ("lineHeight", StyleValue::Number(1.6)),
            ("margin", StyleValue::Number(0.0)),
        ]));
        assert_eq!(css, "font-weight: 700;\nline-height: 1.6;\nmargin: 0;\n");
    }

    #[test]
    fn every_declaration_is_written() {
        let record = style_map([
            ("backgroundColor", StyleValue::from("#fff")),
            ("borderRadius", StyleValue::Number(6.0)),
            ("opacity", StyleValue::Number(0.5)),
            ("zIndex", StyleValue::Number(3.0)),
        ]);
        assert_eq!(
            to_css(&record),
            "background-color: #fff;\nborder-radius: 6px;\nopacity: 0.5;\nz-index: 3;\n"
        );
    }

    #[test]
    fn kebab_passthrough() {
        assert_eq!(kebab_case("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(kebab_case("border-top"), "border-top");
    }
}
