//! Editor session configuration.

use pb_core::Breakpoint;
use serde::Deserialize;

/// Configuration for an [`Editor`](crate::Editor) session.
///
/// Every field has a default, so a config document only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum undo depth; the oldest entries are dropped first. Default: **100**.
    pub history_limit: usize,

    /// Breakpoint the session starts in. Default: **desktop**.
    pub initial_breakpoint: Breakpoint,

    /// Select the node created by insert, paste, or duplicate. Default: **false**.
    pub select_on_insert: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            initial_breakpoint: Breakpoint::Desktop,
            select_on_insert: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
