//! Undo/Redo history.
//!
//! History is snapshot based: every committed edit pushes the whole
//! pre-edit [`Document`] (forest + selection) onto `past`. Undo swaps the
//! current document with the top of `past` and parks the current one on
//! `future`; redo does the reverse. There is no per-operation inverse to get
//! wrong, and editor-sized trees are cheap to clone.
//!
//! An edit whose result is structurally equal to its starting point is
//! dropped, so undo always changes something visible. Batches collapse any
//! number of edits into one step (captured at the start of the outermost
//! batch, compared at its end).

use pb_core::Document;

/// One undoable step: the document as it was on the other side of the edit.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: Document,
    pub label: String,
}

/// Bounded past/future snapshot stacks with batch grouping.
#[derive(Debug)]
pub struct History {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Snapshot captured at the start of the outermost batch.
    batch_snapshot: Option<HistoryEntry>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::with_capacity(max_depth.min(256)),
            future: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
        }
    }

    /// Record a committed edit that turned `before` into `after`.
    ///
    /// Returns whether a new undo step was written. No-op edits and edits
    /// inside a batch write nothing here.
    pub fn record(&mut self, before: Document, after: &Document, label: &str) -> bool {
        if self.batch_depth > 0 {
            return false;
        }
        if before == *after {
            log::trace!("{label}: no change, not recorded");
            return false;
        }
        self.push(HistoryEntry {
            snapshot: before,
            label: label.to_string(),
        });
        true
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.past.push(entry);
        if self.past.len() > self.max_depth {
            let excess = self.past.len() - self.max_depth;
            self.past.drain(..excess);
        }
        self.future.clear();
    }

    /// Start a batch group. The outermost call captures `current` as the
    /// state one undo will return to.
    pub fn begin_batch(&mut self, current: &Document, label: &str) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(HistoryEntry {
                snapshot: current.clone(),
                label: label.to_string(),
            });
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and `current`
    /// differs from the captured snapshot, one undo step is pushed.
    pub fn end_batch(&mut self, current: &Document) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        match self.batch_snapshot.take() {
            Some(entry) if entry.snapshot != *current => {
                log::debug!("batch \"{}\" committed", entry.label);
                self.push(entry);
                true
            }
            _ => false,
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Restore the previous snapshot into `current`. Returns the label of the
    /// step undone, or `None` if there is nothing to undo (or a batch is open).
    pub fn undo(&mut self, current: &mut Document) -> Option<String> {
        if self.is_batching() {
            log::warn!("undo ignored while a batch is open");
            return None;
        }
        let entry = self.past.pop()?;
        let after = std::mem::replace(current, entry.snapshot);
        self.future.push(HistoryEntry {
            snapshot: after,
            label: entry.label.clone(),
        });
        Some(entry.label)
    }

    /// Reapply the most recently undone step.
    pub fn redo(&mut self, current: &mut Document) -> Option<String> {
        if self.is_batching() {
            log::warn!("redo ignored while a batch is open");
            return None;
        }
        let entry = self.future.pop()?;
        let before = std::mem::replace(current, entry.snapshot);
        self.past.push(HistoryEntry {
            snapshot: before,
            label: entry.label.clone(),
        });
        Some(entry.label)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    /// Label of the step the next undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.past.last().map(|e| e.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().map(|e| e.label.as_str())
    }

    /// Forget everything, including any open batch.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}
