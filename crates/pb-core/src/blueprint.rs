//! Blueprints: pre-built subtrees (layout sections, composite widgets) that
//! are cloned into a document.
//!
//! A blueprint carries placeholder ids that are neither unique nor stable.
//! [`Blueprint::instantiate`] is the only way its nodes enter a document and
//! it gives every node a fresh id. The layout generator produces the same
//! shape as JSON, read with [`Blueprint::from_json`].

use crate::id::NodeId;
use crate::model::{
    Align, Background, ButtonVariant, Node, NodeContent, NodeKind, StyleValue, style_map,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlueprintCategory {
    Layout,
    Section,
    Widget,
}

/// A named template subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    pub label: String,
    pub category: BlueprintCategory,
    pub root: Node,
}

impl Blueprint {
    pub fn new(name: &str, label: &str, category: BlueprintCategory, root: Node) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            category,
            root,
        }
    }

    /// Parse a blueprint supplied as JSON (e.g. by the layout generator).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A detached copy of the template with fresh ids throughout.
    pub fn instantiate(&self) -> Node {
        self.root.clone_fresh()
    }

    pub fn kind(&self) -> NodeKind {
        self.root.kind()
    }
}

/// Lookup table of blueprints by name.
#[derive(Debug, Clone, Default)]
pub struct BlueprintLibrary {
    entries: Vec<Blueprint>,
}

impl BlueprintLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock sections and widgets.
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.register(hero());
        lib.register(feature_card());
        lib.register(features());
        lib.register(two_columns());
        lib.register(call_to_action());
        lib.register(navbar());
        lib
    }

    /// Add or replace (by name) a blueprint.
    pub fn register(&mut self, blueprint: Blueprint) {
        if let Some(existing) = self.entries.iter_mut().find(|b| b.name == blueprint.name) {
            *existing = blueprint;
        } else {
            self.entries.push(blueprint);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Blueprint> {
        self.entries.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blueprint> {
        self.entries.iter()
    }

    pub fn by_category(&self, category: BlueprintCategory) -> impl Iterator<Item = &Blueprint> {
        self.entries.iter().filter(move |b| b.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Stock blueprints ────────────────────────────────────────────────────

fn placeholder(name: &str, content: NodeContent) -> Node {
    Node::with_content(NodeId::intern(&format!("bp_{name}")), content)
}

fn heading(name: &str, value: &str, level: u8) -> Node {
    placeholder(
        name,
        NodeContent::Heading {
            text: value.into(),
            level,
        },
    )
}

fn paragraph(name: &str, value: &str) -> Node {
    placeholder(name, NodeContent::Paragraph { text: value.into() })
}

fn button(name: &str, value: &str) -> Node {
    placeholder(
        name,
        NodeContent::Button {
            text: value.into(),
            href: Some("#".into()),
            variant: ButtonVariant::Primary,
        },
    )
}

fn section(name: &str, background: Background) -> Node {
    placeholder(
        name,
        NodeContent::Section {
            background,
            full_height: false,
        },
    )
}

fn container(name: &str) -> Node {
    placeholder(
        name,
        NodeContent::Container {
            max_width: 1200,
            align: Align::Center,
        },
    )
}

fn row(name: &str) -> Node {
    placeholder(name, NodeContent::Row { gap: 24, wrap: true })
}

fn column(name: &str, span: u8) -> Node {
    placeholder(name, NodeContent::Column { span })
}

fn hero() -> Blueprint {
    let mut title = heading("hero_title", "Build something people love", 1);
    title.style.desktop.insert("fontSize".into(), StyleValue::Number(56.0));
    title.style.tablet = Some(style_map([("fontSize", 44)]));
    title.style.mobile = Some(style_map([("fontSize", 32)]));

    let root = section(
        "hero",
        Background::Color {
            value: "#0f172a".into(),
        },
    )
    .with_style(style_map([
        ("padding", StyleValue::from("120px 24px")),
        ("color", StyleValue::from("#f8fafc")),
        ("textAlign", StyleValue::from("center")),
    ]))
    .with_child(
        container("hero_inner")
            .with_child(title)
            .with_child(paragraph(
                "hero_lead",
                "A short sentence that explains the value of your product.",
            ))
            .with_child(button("hero_cta", "Get started")),
    );
    Blueprint::new("hero", "Hero", BlueprintCategory::Section, root)
}

fn feature_card() -> Blueprint {
    let icon = placeholder(
        "card_icon",
        NodeContent::Icon {
            name: "zap".into(),
            size: 32,
        },
    );
    let root = column("card", 4)
        .with_style(style_map([
            ("padding", StyleValue::from("24px")),
            ("borderRadius", StyleValue::Number(12.0)),
            ("backgroundColor", StyleValue::from("#ffffff")),
        ]))
        .with_child(icon)
        .with_child(heading("card_title", "Fast", 3))
        .with_child(paragraph("card_body", "Describe the feature in one or two lines."));
    Blueprint::new("feature-card", "Feature card", BlueprintCategory::Widget, root)
}

fn features() -> Blueprint {
    let card = feature_card().root;
    let root = section("features", Background::None).with_child(
        container("features_inner").with_child(
            row("features_row")
                .with_child(card.clone())
                .with_child(card.clone())
                .with_child(card),
        ),
    );
    Blueprint::new("features", "Features", BlueprintCategory::Section, root)
}

fn two_columns() -> Blueprint {
    let mut root = row("split");
    root.style.mobile = Some(style_map([("flexDirection", "column")]));
    let root = root
        .with_child(column("split_left", 6))
        .with_child(column("split_right", 6));
    Blueprint::new("two-columns", "Two columns", BlueprintCategory::Layout, root)
}

fn call_to_action() -> Blueprint {
    let root = section(
        "cta",
        Background::Color {
            value: "#2563eb".into(),
        },
    )
    .with_child(
        container("cta_inner")
            .with_child(heading("cta_title", "Ready to dive in?", 2))
            .with_child(button("cta_button", "Start free trial")),
    );
    Blueprint::new("call-to-action", "Call to action", BlueprintCategory::Section, root)
}

fn navbar() -> Blueprint {
    let link = |name: &str, label: &str| {
        placeholder(
            name,
            NodeContent::Link {
                href: "#".into(),
                new_tab: false,
            },
        )
        .with_child(paragraph(&format!("{name}_label"), label))
    };
    let mut links = row("nav_links");
    links.visibility.hide_mobile = true;
    let root = section("nav", Background::None)
        .with_style(style_map([("padding", "16px 24px")]))
        .with_child(
            row("nav_bar")
                .with_child(heading("nav_brand", "Brand", 4))
                .with_child(
                    links
                        .with_child(link("nav_home", "Home"))
                        .with_child(link("nav_about", "About"))
                        .with_child(link("nav_contact", "Contact")),
                ),
        );
    Blueprint::new("navbar", "Navigation bar", BlueprintCategory::Section, root)
}
