//! Error types for editor operations.
//!
//! Every failing operation leaves the document, selection, and history
//! exactly as they were. The error only says why nothing happened.

use pb_core::{NodeId, PatchError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("node {0} not found")]
    NotFound(NodeId),

    #[error("illegal structure: {reason}")]
    IllegalStructure { reason: String },

    #[error("clipboard holds {found}, expected {expected}")]
    ClipboardMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid props: {0}")]
    InvalidProps(String),
}

impl EditError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        EditError::IllegalStructure {
            reason: reason.into(),
        }
    }
}

impl From<PatchError> for EditError {
    fn from(e: PatchError) -> Self {
        EditError::InvalidProps(e.to_string())
    }
}

pub type EditResult<T> = Result<T, EditError>;
