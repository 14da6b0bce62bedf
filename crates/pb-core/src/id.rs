use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for node IDs: fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Counter backing [`NodeId::fresh`]. Never reset for the life of the process.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A lightweight, interned identifier for nodes in the document tree.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
///
/// Every id string the process has ever seen (created, loaded from persisted
/// state, or supplied by a blueprint) lives in the interner, which is what lets
/// [`NodeId::fresh`] promise an id nobody else holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one if already interned.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a process-unique ID with a kind prefix (e.g. `section_4`, `button_12`).
    ///
    /// Candidates that were already interned (say, `section_4` loaded from a
    /// saved document) are skipped.
    pub fn fresh(prefix: &str) -> Self {
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            if !INTERNER.contains(candidate.as_str()) {
                return Self::intern(&candidate);
            }
            log::trace!("id {candidate} already taken, skipping");
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("hero_section");
        let b = NodeId::intern("hero_section");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hero_section");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = NodeId::fresh("button");
        let b = NodeId::fresh("button");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("button_"));
    }

    #[test]
    fn fresh_skips_ids_seen_elsewhere() {
        // Pre-intern the next few candidates as if a saved document used them.
        let peek = COUNTER.load(Ordering::Relaxed);
        let taken: Vec<NodeId> = (peek..peek + 4)
            .map(|n| NodeId::intern(&format!("taken_{n}")))
            .collect();
        let fresh = NodeId::fresh("taken");
        assert!(!taken.contains(&fresh));
    }
}
