//! Core document-tree data model for page-builder documents.
//!
//! A document is a **forest**: an ordered sequence of root nodes with no
//! implicit document root. Each node owns its children outright (a plain
//! `Vec<Node>`); the `parent` field is only a back-reference by id, kept in
//! sync by whoever changes structure. Content is a closed tagged union, one
//! variant per [`NodeKind`], so every match over kinds is exhaustive.
//!
//! Styles are stored per breakpoint and never pre-resolved; see
//! [`crate::cascade`] for how they are layered.

use crate::error::PatchError;
use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Breakpoints ─────────────────────────────────────────────────────────

/// Responsive breakpoint. Desktop is the base every other one inherits from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Desktop, Breakpoint::Tablet, Breakpoint::Mobile];

    /// The layers that apply at this breakpoint, base first.
    pub fn cascade(self) -> &'static [Breakpoint] {
        match self {
            Breakpoint::Desktop => &Self::ALL[..1],
            Breakpoint::Tablet => &Self::ALL[..2],
            Breakpoint::Mobile => &Self::ALL[..],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Desktop => "desktop",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Mobile => "mobile",
        }
    }
}

// ─── Style records ───────────────────────────────────────────────────────

/// A single style property value: either a raw number or a CSS string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for StyleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<i32> for StyleValue {
    fn from(n: i32) -> Self {
        StyleValue::Number(f64::from(n))
    }
}

/// Flat mapping of style-property name (camelCase) to value.
/// Ordered, so iteration and serialization are deterministic.
pub type StyleMap = BTreeMap<String, StyleValue>;

/// Build a [`StyleMap`] from `(name, value)` pairs.
pub fn style_map<K, V, I>(pairs: I) -> StyleMap
where
    K: Into<String>,
    V: Into<StyleValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Per-breakpoint style of a node. `desktop` is always present; the others
/// are sparse overrides. `hover` is a pseudo-state overlay, never part of the
/// base cascade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(default)]
    pub desktop: StyleMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<StyleMap>,
}

impl NodeStyle {
    /// The raw record stored for `bp`, without any cascading.
    pub fn record(&self, bp: Breakpoint) -> Option<&StyleMap> {
        match bp {
            Breakpoint::Desktop => Some(&self.desktop),
            Breakpoint::Tablet => self.tablet.as_ref(),
            Breakpoint::Mobile => self.mobile.as_ref(),
        }
    }

    /// The record for `bp`, created empty if absent.
    pub fn record_mut(&mut self, bp: Breakpoint) -> &mut StyleMap {
        match bp {
            Breakpoint::Desktop => &mut self.desktop,
            Breakpoint::Tablet => self.tablet.get_or_insert_with(StyleMap::new),
            Breakpoint::Mobile => self.mobile.get_or_insert_with(StyleMap::new),
        }
    }

    /// Shallow-merge `partial` into the record for `bp`.
    pub fn merge(&mut self, bp: Breakpoint, partial: &StyleMap) {
        let record = self.record_mut(bp);
        for (k, v) in partial {
            record.insert(k.clone(), v.clone());
        }
    }

    /// Shallow-merge `partial` into the hover record.
    pub fn merge_hover(&mut self, partial: &StyleMap) {
        let record = self.hover.get_or_insert_with(StyleMap::new);
        for (k, v) in partial {
            record.insert(k.clone(), v.clone());
        }
    }

    /// Drop the override for `bp`. Desktop is emptied rather than removed.
    pub fn reset(&mut self, bp: Breakpoint) {
        match bp {
            Breakpoint::Desktop => self.desktop.clear(),
            Breakpoint::Tablet => self.tablet = None,
            Breakpoint::Mobile => self.mobile = None,
        }
    }

    /// Starting style for a freshly inserted node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        let desktop = match kind {
            NodeKind::Section => style_map([("padding", "64px 24px")]),
            NodeKind::Container => style_map([("width", "100%"), ("margin", "0 auto")]),
            NodeKind::Row => style_map([("display", "flex")]),
            NodeKind::Column => style_map([
                ("flex", StyleValue::Number(1.0)),
                ("padding", StyleValue::from("8px")),
            ]),
            NodeKind::Heading => style_map([
                ("fontSize", StyleValue::Number(32.0)),
                ("fontWeight", StyleValue::Number(700.0)),
            ]),
            NodeKind::Paragraph => style_map([
                ("fontSize", StyleValue::Number(16.0)),
                ("lineHeight", StyleValue::Number(1.6)),
            ]),
            NodeKind::Button => style_map([
                ("padding", StyleValue::from("12px 24px")),
                ("backgroundColor", StyleValue::from("#2563eb")),
                ("color", StyleValue::from("#ffffff")),
                ("borderRadius", StyleValue::Number(6.0)),
            ]),
            NodeKind::Image | NodeKind::Video => style_map([("width", "100%")]),
            NodeKind::Icon => style_map([("fontSize", 24)]),
            NodeKind::Divider => style_map([("borderTop", "1px solid #e5e7eb")]),
            NodeKind::Link => style_map([("color", "#2563eb")]),
        };
        Self {
            desktop,
            ..Self::default()
        }
    }
}

// ─── Visibility ──────────────────────────────────────────────────────────

/// Per-breakpoint "hide this node" flags. All visible by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    #[serde(default)]
    pub hide_desktop: bool,
    #[serde(default)]
    pub hide_tablet: bool,
    #[serde(default)]
    pub hide_mobile: bool,
}

impl Visibility {
    pub fn is_visible(&self, bp: Breakpoint) -> bool {
        !match bp {
            Breakpoint::Desktop => self.hide_desktop,
            Breakpoint::Tablet => self.hide_tablet,
            Breakpoint::Mobile => self.hide_mobile,
        }
    }

    pub fn set_visible(&mut self, bp: Breakpoint, visible: bool) {
        let flag = match bp {
            Breakpoint::Desktop => &mut self.hide_desktop,
            Breakpoint::Tablet => &mut self.hide_tablet,
            Breakpoint::Mobile => &mut self.hide_mobile,
        };
        *flag = !visible;
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

// ─── Kinds & content ─────────────────────────────────────────────────────

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Section,
    Container,
    Row,
    Column,
    Heading,
    Paragraph,
    Button,
    Image,
    Icon,
    Divider,
    Link,
    Video,
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Section,
        NodeKind::Container,
        NodeKind::Row,
        NodeKind::Column,
        NodeKind::Heading,
        NodeKind::Paragraph,
        NodeKind::Button,
        NodeKind::Image,
        NodeKind::Icon,
        NodeKind::Divider,
        NodeKind::Link,
        NodeKind::Video,
    ];

    /// Whether nodes of this kind may have children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Section | NodeKind::Container | NodeKind::Row | NodeKind::Column | NodeKind::Link
        )
    }

    /// Lowercase name, also used as the prefix of generated ids.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Container => "container",
            NodeKind::Row => "row",
            NodeKind::Column => "column",
            NodeKind::Heading => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Button => "button",
            NodeKind::Image => "image",
            NodeKind::Icon => "icon",
            NodeKind::Divider => "divider",
            NodeKind::Link => "link",
            NodeKind::Video => "video",
        }
    }
}

/// Horizontal alignment of a container's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
}

/// Section background descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    #[default]
    None,
    Color {
        value: String,
    },
    Image {
        src: String,
        /// Optional tint drawn over the image (any CSS color).
        overlay: Option<String>,
    },
}

/// Kind-dependent content and structured props. The variant *is* the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeContent {
    Section {
        background: Background,
        full_height: bool,
    },
    Container {
        /// Maximum content width in px.
        max_width: u32,
        align: Align,
    },
    Row {
        gap: u32,
        wrap: bool,
    },
    Column {
        /// Width in twelfths of the parent row.
        span: u8,
    },
    Heading {
        text: String,
        level: u8,
    },
    Paragraph {
        text: String,
    },
    Button {
        text: String,
        href: Option<String>,
        variant: ButtonVariant,
    },
    Image {
        src: String,
        alt: String,
    },
    Icon {
        name: String,
        size: u32,
    },
    Divider,
    Link {
        href: String,
        new_tab: bool,
    },
    Video {
        src: String,
        autoplay: bool,
        controls: bool,
    },
}

/// A partial content update: field name to new JSON value.
pub type ContentPatch = serde_json::Map<String, serde_json::Value>;

impl NodeContent {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeContent::Section { .. } => NodeKind::Section,
            NodeContent::Container { .. } => NodeKind::Container,
            NodeContent::Row { .. } => NodeKind::Row,
            NodeContent::Column { .. } => NodeKind::Column,
            NodeContent::Heading { .. } => NodeKind::Heading,
            NodeContent::Paragraph { .. } => NodeKind::Paragraph,
            NodeContent::Button { .. } => NodeKind::Button,
            NodeContent::Image { .. } => NodeKind::Image,
            NodeContent::Icon { .. } => NodeKind::Icon,
            NodeContent::Divider => NodeKind::Divider,
            NodeContent::Link { .. } => NodeKind::Link,
            NodeContent::Video { .. } => NodeKind::Video,
        }
    }

    /// Placeholder content for a freshly inserted node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Section => NodeContent::Section {
                background: Background::None,
                full_height: false,
            },
            NodeKind::Container => NodeContent::Container {
                max_width: 1200,
                align: Align::Center,
            },
            NodeKind::Row => NodeContent::Row { gap: 16, wrap: true },
            NodeKind::Column => NodeContent::Column { span: 12 },
            NodeKind::Heading => NodeContent::Heading {
                text: "Heading".into(),
                level: 2,
            },
            NodeKind::Paragraph => NodeContent::Paragraph {
                text: "Write something here.".into(),
            },
            NodeKind::Button => NodeContent::Button {
                text: "Click me".into(),
                href: None,
                variant: ButtonVariant::Primary,
            },
            NodeKind::Image => NodeContent::Image {
                src: "https://placehold.co/600x400".into(),
                alt: String::new(),
            },
            NodeKind::Icon => NodeContent::Icon {
                name: "star".into(),
                size: 24,
            },
            NodeKind::Divider => NodeContent::Divider,
            NodeKind::Link => NodeContent::Link {
                href: "#".into(),
                new_tab: false,
            },
            NodeKind::Video => NodeContent::Video {
                src: String::new(),
                autoplay: false,
                controls: true,
            },
        }
    }

    /// Shallow-merge `patch` into this content, returning the merged value.
    ///
    /// Keys are the variant's field names. The kind itself cannot change, and
    /// a value of the wrong type for its field rejects the whole patch.
    pub fn merged(&self, patch: &ContentPatch) -> Result<NodeContent, PatchError> {
        let kind = self.kind();
        if let Some(tag) = patch.get("kind")
            && tag.as_str() != Some(kind.as_str())
        {
            return Err(PatchError::KindChange {
                from: kind,
                to: tag.to_string(),
            });
        }

        let mut value = serde_json::to_value(self)?;
        let serde_json::Value::Object(fields) = &mut value else {
            return Err(PatchError::NotAnObject);
        };
        for (key, v) in patch {
            if key == "kind" {
                continue;
            }
            if !fields.contains_key(key) {
                return Err(PatchError::UnknownField {
                    kind,
                    field: key.clone(),
                });
            }
            fields.insert(key.clone(), v.clone());
        }
        Ok(serde_json::from_value(value)?)
    }
}

// ─── Node ────────────────────────────────────────────────────────────────

/// A single element of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Process-unique, immutable for the node's lifetime.
    pub id: NodeId,

    /// Id of the containing node, `None` for roots. Never owning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    /// Kind-dependent content; the variant determines the kind.
    pub content: NodeContent,

    #[serde(default)]
    pub style: NodeStyle,

    #[serde(default, skip_serializing_if = "Visibility::is_default")]
    pub visibility: Visibility,

    /// Ordered children (render and tab order). Only container kinds may
    /// have any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// A new detached node of `kind` with a fresh id and default content/style.
    pub fn new(kind: NodeKind) -> Self {
        Self::with_content(NodeId::fresh(kind.as_str()), NodeContent::default_for(kind))
    }

    /// A detached node with explicit id and content, default style for its kind.
    pub fn with_content(id: NodeId, content: NodeContent) -> Self {
        let style = NodeStyle::default_for(content.kind());
        Self {
            id,
            parent: None,
            content,
            style,
            visibility: Visibility::default(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.content.kind()
    }

    pub fn accepts_children(&self) -> bool {
        self.kind().is_container()
    }

    pub fn is_visible(&self, bp: Breakpoint) -> bool {
        self.visibility.is_visible(bp)
    }

    /// Builder: append `child`, pointing its back-reference here.
    pub fn with_child(mut self, mut child: Node) -> Self {
        child.parent = Some(self.id);
        self.children.push(child);
        self
    }

    /// Builder: replace the desktop style record.
    pub fn with_style(mut self, desktop: StyleMap) -> Self {
        self.style.desktop = desktop;
        self
    }

    /// Re-point every child's back-reference at its owner, recursively.
    pub fn relink(&mut self) {
        let id = self.id;
        for child in &mut self.children {
            child.parent = Some(id);
            child.relink();
        }
    }

    /// Deep copy with a fresh id on every node of the subtree.
    ///
    /// Internal parent/child structure is preserved; the copy's own `parent`
    /// is cleared and must be set by whoever attaches it.
    pub fn clone_fresh(&self) -> Node {
        let mut copy = Node {
            id: NodeId::fresh(self.kind().as_str()),
            parent: None,
            content: self.content.clone(),
            style: self.style.clone(),
            visibility: self.visibility,
            children: Vec::with_capacity(self.children.len()),
        };
        for child in &self.children {
            let mut c = child.clone_fresh();
            c.parent = Some(copy.id);
            copy.children.push(c);
        }
        copy
    }

    /// Depth-first, pre-order walk over this node and its descendants.
    pub fn iter(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        self.iter().count()
    }
}

/// Pre-order iterator over a subtree or a whole forest.
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ─── Forest & Document ───────────────────────────────────────────────────

/// The ordered sequence of root nodes making up a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub roots: Vec<Node>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(mut roots: Vec<Node>) -> Self {
        for root in &mut roots {
            root.parent = None;
            root.relink();
        }
        Self { roots }
    }

    /// Depth-first, pre-order walk over every node.
    pub fn iter(&self) -> Walk<'_> {
        Walk {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Re-derive every back-reference from structure.
    pub fn relink(&mut self) {
        for root in &mut self.roots {
            root.parent = None;
            root.relink();
        }
    }
}

/// The unit captured by history and persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub forest: Forest,
    #[serde(default)]
    pub selected: Option<NodeId>,
}

impl Document {
    pub fn new(forest: Forest) -> Self {
        Self {
            forest,
            selected: None,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_layout_kinds_are_containers() {
        let containers: Vec<_> = NodeKind::ALL
            .into_iter()
            .filter(|k| k.is_container())
            .collect();
        assert_eq!(
            containers,
            vec![
                NodeKind::Section,
                NodeKind::Container,
                NodeKind::Row,
                NodeKind::Column,
                NodeKind::Link
            ]
        );
    }

    #[test]
    fn default_content_matches_kind() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeContent::default_for(kind).kind(), kind);
            assert_eq!(Node::new(kind).kind(), kind);
        }
    }

    #[test]
    fn walk_is_preorder() {
        let a = NodeId::intern("walk_a");
        let b = NodeId::intern("walk_b");
        let c = NodeId::intern("walk_c");
        let tree = Node::with_content(a, NodeContent::default_for(NodeKind::Section)).with_child(
            Node::with_content(b, NodeContent::default_for(NodeKind::Container)).with_child(
                Node::with_content(c, NodeContent::default_for(NodeKind::Button)),
            ),
        );
        let d = Node::new(NodeKind::Divider);
        let d_id = d.id;
        let forest = Forest::from_roots(vec![tree, d]);
        let ids: Vec<_> = forest.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b, c, d_id]);
        assert_eq!(forest.len(), 4);
    }

    #[test]
    fn clone_fresh_reassigns_every_id() {
        let original = Node::new(NodeKind::Row)
            .with_child(Node::new(NodeKind::Column).with_child(Node::new(NodeKind::Heading)))
            .with_child(Node::new(NodeKind::Column));
        let copy = original.clone_fresh();

        assert_eq!(copy.subtree_len(), original.subtree_len());
        for (a, b) in original.iter().zip(copy.iter()) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.content, b.content);
        }
        assert_eq!(copy.parent, None);
        assert_eq!(copy.children[0].parent, Some(copy.id));
        assert_eq!(copy.children[0].children[0].parent, Some(copy.children[0].id));
    }

    #[test]
    fn style_merge_creates_missing_breakpoint() {
        let mut style = NodeStyle::default();
        assert!(style.tablet.is_none());
        style.merge(Breakpoint::Tablet, &style_map([("color", "red")]));
        assert_eq!(
            style.record(Breakpoint::Tablet),
            Some(&style_map([("color", "red")]))
        );
        style.reset(Breakpoint::Tablet);
        assert!(style.tablet.is_none());
    }

    #[test]
    fn content_patch_merges_fields() {
        let content = NodeContent::default_for(NodeKind::Heading);
        let mut patch = ContentPatch::new();
        patch.insert("text".into(), serde_json::json!("Welcome"));
        let merged = content.merged(&patch).unwrap();
        assert_eq!(
            merged,
            NodeContent::Heading {
                text: "Welcome".into(),
                level: 2
            }
        );
    }

    #[test]
    fn content_patch_rejects_kind_change_and_bad_types() {
        let content = NodeContent::default_for(NodeKind::Heading);

        let mut kind_change = ContentPatch::new();
        kind_change.insert("kind".into(), serde_json::json!("button"));
        assert!(matches!(
            content.merged(&kind_change),
            Err(PatchError::KindChange { .. })
        ));

        let mut bad_type = ContentPatch::new();
        bad_type.insert("level".into(), serde_json::json!("huge"));
        assert!(matches!(content.merged(&bad_type), Err(PatchError::Json(_))));

        let mut unknown = ContentPatch::new();
        unknown.insert("src".into(), serde_json::json!("x.png"));
        assert!(matches!(
            content.merged(&unknown),
            Err(PatchError::UnknownField { .. })
        ));
    }

    #[test]
    fn visibility_flags_per_breakpoint() {
        let mut v = Visibility::default();
        assert!(v.is_default());
        v.set_visible(Breakpoint::Mobile, false);
        assert!(v.is_visible(Breakpoint::Desktop));
        assert!(!v.is_visible(Breakpoint::Mobile));
    }

    #[test]
    fn style_value_display() {
        assert_eq!(StyleValue::Number(16.0).to_string(), "16");
        assert_eq!(StyleValue::Number(1.5).to_string(), "1.5");
        assert_eq!(StyleValue::from("auto").to_string(), "auto");
    }
}
