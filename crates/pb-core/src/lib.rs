//! # pb-core
//!
//! Document tree model for the page builder: typed nodes in an owned
//! forest, id-based path resolution, the responsive style cascade,
//! blueprint cloning, invariant linting, and session persistence.
//!
//! Everything here is pure data manipulation. Editing with history and a
//! clipboard lives in `pb-editor`.

pub mod blueprint;
pub mod cascade;
pub mod error;
pub mod id;
pub mod lint;
pub mod model;
pub mod path;
pub mod persist;

pub use blueprint::{Blueprint, BlueprintCategory, BlueprintLibrary};
pub use cascade::{StyleState, resolve_forest, resolve_style, resolve_style_state, to_css};
pub use error::{PatchError, PersistError};
pub use id::NodeId;
pub use lint::{LintDiagnostic, LintSeverity, is_consistent, lint_forest};
pub use model::*;
pub use path::{Located, NodePath};
