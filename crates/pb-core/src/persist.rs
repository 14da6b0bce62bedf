//! Session persistence for [`Document`] (forest + selection).
//!
//! JSON is the human-readable format; MessagePack (named fields, so the
//! tagged content unions survive) is the compact one. Loading derives every
//! `parent` back-reference from structure, then refuses documents that break
//! tree invariants. Schema migration of older shapes runs before this and is
//! not handled here.

use crate::error::PersistError;
use crate::lint::{LintSeverity, lint_forest};
use crate::model::Document;
use crate::path;

impl Document {
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        finish_load(serde_json::from_str(json)?)
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>, PersistError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, PersistError> {
        finish_load(rmp_serde::from_slice(bytes)?)
    }

    /// Re-derive every `parent` link from structure and drop a selection
    /// that no longer resolves. Does not check the remaining invariants.
    pub fn normalize(&mut self) {
        self.forest.relink();
        if let Some(selected) = self.selected
            && !path::contains(&self.forest, selected)
        {
            log::warn!("dropping selection of missing node {selected}");
            self.selected = None;
        }
    }
}

fn finish_load(mut doc: Document) -> Result<Document, PersistError> {
    doc.normalize();

    let errors: Vec<_> = lint_forest(&doc.forest)
        .into_iter()
        .filter(|d| d.severity == LintSeverity::Error)
        .collect();
    if !errors.is_empty() {
        log::warn!("rejecting document: {} invariant violation(s)", errors.len());
        return Err(PersistError::Invalid(errors));
    }

    log::debug!("loaded document with {} node(s)", doc.forest.len());
    Ok(doc)
}
