//! Per-note debounce of in-progress content edits.
//!
//! # Responsibility
//! - Collapse rapid keystrokes on one note into a single pending write.
//! - Release edits whose quiet period has elapsed.
//!
//! # Invariants
//! - Each note has at most one pending edit; staging again restarts its timer.
//! - A cancelled edit is never released.
//! - Deadlines come from the caller's clock; there are no background threads.

use crate::model::note::NoteId;
use std::collections::HashMap;
use std::time::Duration;

/// Quiet period before typed text is saved.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(700);

/// Content waiting for its quiet period to elapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub content: String,
    /// Epoch milliseconds after which the edit may be written.
    pub due_at_ms: i64,
}

/// Map from note id to its single pending edit.
#[derive(Debug, Clone)]
pub struct AutosaveQueue {
    delay_ms: i64,
    pending: HashMap<NoteId, PendingEdit>,
}

impl Default for AutosaveQueue {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl AutosaveQueue {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: i64::try_from(delay.as_millis()).unwrap_or(i64::MAX),
            pending: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.delay_ms).unwrap_or(0))
    }

    /// Stages `content` for `id`, replacing and restarting any earlier edit.
    ///
    /// Returns the new deadline.
    pub fn stage(&mut self, id: impl Into<NoteId>, content: impl Into<String>, now_ms: i64) -> i64 {
        let due_at_ms = now_ms.saturating_add(self.delay_ms);
        self.pending.insert(
            id.into(),
            PendingEdit {
                content: content.into(),
                due_at_ms,
            },
        );
        due_at_ms
    }

    /// Drops the pending edit for `id`.
    pub fn cancel(&mut self, id: &str) -> Option<PendingEdit> {
        self.pending.remove(id)
    }

    /// Drops every pending edit. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending(&self, id: &str) -> Option<&PendingEdit> {
        self.pending.get(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending edits.
    pub fn next_due_ms(&self) -> Option<i64> {
        self.pending.values().map(|edit| edit.due_at_ms).min()
    }

    /// Removes and returns edits due at `now_ms`, oldest deadline first.
    pub fn take_due(&mut self, now_ms: i64) -> Vec<(NoteId, String)> {
        let due_ids: Vec<NoteId> = self
            .pending
            .iter()
            .filter(|(_, edit)| edit.due_at_ms <= now_ms)
            .map(|(id, _)| id.clone())
            .collect();
        self.release(due_ids)
    }

    /// Removes and returns every pending edit regardless of deadline.
    pub fn take_all(&mut self) -> Vec<(NoteId, String)> {
        let ids: Vec<NoteId> = self.pending.keys().cloned().collect();
        self.release(ids)
    }

    fn release(&mut self, ids: Vec<NoteId>) -> Vec<(NoteId, String)> {
        let mut released: Vec<(NoteId, PendingEdit)> = ids
            .into_iter()
            .filter_map(|id| self.pending.remove(&id).map(|edit| (id, edit)))
            .collect();
        released.sort_by(|(left_id, left), (right_id, right)| {
            left.due_at_ms
                .cmp(&right.due_at_ms)
                .then_with(|| left_id.cmp(right_id))
        });
        released
            .into_iter()
            .map(|(id, edit)| (id, edit.content))
            .collect()
    }
}
