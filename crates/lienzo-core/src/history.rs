//! Bounded linear undo/redo log of full document snapshots.

use crate::document::{Document, DocumentResult, Snapshot};

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Undo/redo history.
///
/// The cursor points at the snapshot matching the current document. After every
/// [`HistoryLog::save`] it points at the newest entry.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<Snapshot>,
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    /// Create an empty log. Capacity is at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Capture the document as the newest entry.
    ///
    /// Entries after the cursor are discarded first; the oldest entry is evicted when the
    /// log is over capacity. On serialization failure the log is left untouched.
    pub fn save(&mut self, document: &Document) -> DocumentResult<()> {
        let snapshot = document.serialize().inspect_err(|e| {
            log::error!("Failed to capture history snapshot: {e}");
        })?;

        let keep = self.cursor.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);

        log::debug!("History saved ({}/{})", self.entries.len(), self.capacity);
        Ok(())
    }

    /// Step back one entry and restore it into the document.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        match self.cursor {
            Some(i) if i > 0 => self.replay(document, i - 1),
            _ => false,
        }
    }

    /// Step forward one entry and restore it into the document.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        match self.cursor {
            Some(i) if i + 1 < self.entries.len() => self.replay(document, i + 1),
            _ => false,
        }
    }

    fn replay(&mut self, document: &mut Document, target: usize) -> bool {
        let Some(snapshot) = self.entries.get(target) else {
            return false;
        };
        if let Err(e) = document.restore(snapshot) {
            log::error!("Failed to restore history entry {target}: {e}");
            return false;
        }
        log::debug!("History moved to {}/{}", target + 1, self.entries.len());
        self.cursor = Some(target);
        true
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(i) if i + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry, `None` when empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The entry the document currently matches.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor?)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
