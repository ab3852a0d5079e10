use std::collections::VecDeque;

use crate::document::model::RibbonDocument;

/// Options for [`History`].
#[derive(Clone, Copy, Debug)]
pub struct HistoryOpts {
    /// Maximum number of retained snapshots; the oldest is dropped first.
    pub max_snapshots: usize,
}

impl Default for HistoryOpts {
    fn default() -> Self {
        Self { max_snapshots: 100 }
    }
}

/// Linear undo stack of full document snapshots. There is no redo.
#[derive(Clone, Debug, Default)]
pub struct History {
    opts: HistoryOpts,
    snapshots: VecDeque<RibbonDocument>,
}

impl History {
    /// Create an empty history.
    pub fn new(opts: HistoryOpts) -> Self {
        Self {
            opts,
            snapshots: VecDeque::new(),
        }
    }

    /// Record the state *before* a mutation.
    pub fn record(&mut self, before: &RibbonDocument) {
        if self.opts.max_snapshots == 0 {
            return;
        }
        while self.snapshots.len() >= self.opts.max_snapshots {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(before.clone());
    }

    /// Pop the most recent snapshot.
    pub fn undo(&mut self) -> Option<RibbonDocument> {
        self.snapshots.pop_back()
    }

    /// Number of snapshots available to undo.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when nothing can be undone.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/history.rs"]
mod tests;
