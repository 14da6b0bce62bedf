//! Error types for the core model.

use crate::lint::LintDiagnostic;
use crate::model::NodeKind;
use thiserror::Error;

/// A content patch that does not fit the node it targets.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("cannot change kind of a {from:?} node to {to}")]
    KindChange { from: NodeKind, to: String },

    #[error("{kind:?} has no field `{field}`")]
    UnknownField { kind: NodeKind, field: String },

    #[error("content did not serialize to an object")]
    NotAnObject,

    #[error("patched content is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to save or load a persisted document.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("document violates tree invariants ({} problem(s), first: {})", .0.len(), first_message(.0))]
    Invalid(Vec<LintDiagnostic>),
}

fn first_message(diags: &[LintDiagnostic]) -> &str {
    diags.first().map_or("none", |d| d.message.as_str())
}
