//! Note store: the single owner of authoritative note state.
//!
//! # Responsibility
//! - Provide create/update/delete/reorder/import/export/clear/search.
//! - Persist the full collection after every mutation.
//! - Debounce in-progress content edits per note.
//! - Turn storage failures into queued [`Notice`]s.
//!
//! # Invariants
//! - Mutations complete in memory before persistence is attempted.
//! - Storage failures never panic and never propagate to callers.
//! - `position` equals index after every mutation.
//! - Deleting a note cancels its pending autosave.

use crate::clock::{Clock, SystemClock};
use crate::model::collection::NoteCollection;
use crate::model::note::{Note, NoteColor, NoteId, NotePatch};
use crate::model::record::{decode_value, encode_notes_pretty, ImportError};
use crate::repo::note_repo::NoteRepository;
use crate::service::autosave::{AutosaveQueue, DEFAULT_AUTOSAVE_DELAY};
use crate::service::notice::Notice;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::time::Duration;

/// Tunables for a [`NoteStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Quiet period before a staged content edit is written.
    pub autosave_delay: Duration,
    /// Color used by [`NoteStore::create_default`].
    pub default_color: NoteColor,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            default_color: NoteColor::default(),
        }
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Notes prepended to the collection.
    pub added: usize,
    /// Entries dropped: malformed, id-less, duplicated or already present.
    pub skipped: usize,
}

/// Controller owning the note collection and its persistence.
pub struct NoteStore<R: NoteRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    notes: NoteCollection,
    autosave: AutosaveQueue,
    default_color: NoteColor,
    notices: Vec<Notice>,
}

impl<R: NoteRepository> NoteStore<R> {
    /// Opens a store on the system clock with default options.
    pub fn open(repo: R) -> Self {
        Self::open_with(repo, SystemClock, StoreOptions::default())
    }
}

impl<R: NoteRepository, C: Clock> NoteStore<R, C> {
    /// Opens a store, loading whatever the repository holds.
    ///
    /// A read or decode failure is logged, queued as
    /// [`Notice::StorageReadFailed`] and yields an empty collection.
    pub fn open_with(repo: R, clock: C, options: StoreOptions) -> Self {
        let mut notices = Vec::new();
        let notes = match repo.load_notes(clock.now_ms()) {
            Ok(Some(decoded)) => {
                if decoded.skipped > 0 {
                    warn!(
                        "event=store_load module=store status=partial loaded={} skipped={}",
                        decoded.notes.len(),
                        decoded.skipped
                    );
                }
                NoteCollection::from_stored(decoded.notes)
            }
            Ok(None) => NoteCollection::new(),
            Err(err) => {
                error!("event=store_load module=store status=error error={err}");
                notices.push(Notice::StorageReadFailed {
                    message: err.to_string(),
                });
                NoteCollection::new()
            }
        };
        info!(
            "event=store_load module=store status=ok count={}",
            notes.len()
        );

        Self {
            repo,
            clock,
            notes,
            autosave: AutosaveQueue::new(options.autosave_delay),
            default_color: options.default_color,
            notices,
        }
    }

    /// All notes in display order.
    pub fn notes(&self) -> &[Note] {
        self.notes.as_slice()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn default_color(&self) -> NoteColor {
        self.default_color
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Creates a note at the front of the collection and persists.
    pub fn create(&mut self, content: impl Into<String>, color: NoteColor) -> Note {
        let note = Note::new(content, color, self.clock.now_ms());
        self.notes.insert_front(note);
        let created = self.notes.as_slice()[0].clone();
        info!(
            "event=note_create module=store status=ok note_id={} count={}",
            created.id,
            self.notes.len()
        );
        self.persist("create");
        created
    }

    /// Creates an empty note in the configured default color.
    pub fn create_default(&mut self) -> Note {
        self.create(String::new(), self.default_color)
    }

    /// Merges `patch` into the note with `id` and persists.
    ///
    /// Unknown ids are a silent no-op returning `None`.
    pub fn update(&mut self, id: &str, patch: NotePatch) -> Option<Note> {
        let now_ms = self.clock.now_ms();
        let Some(updated) = self.notes.update(id, &patch, now_ms).cloned() else {
            debug!("event=note_update module=store status=skipped reason=not_found note_id={id}");
            return None;
        };
        if patch.content.is_some() {
            // A direct content write supersedes any staged keystrokes.
            self.autosave.cancel(id);
        }
        info!("event=note_update module=store status=ok note_id={id}");
        self.persist("update");
        Some(updated)
    }

    /// Removes the note with `id`, cancelling its pending autosave.
    ///
    /// Unknown ids leave the collection and storage untouched.
    pub fn delete(&mut self, id: &str) -> bool {
        self.autosave.cancel(id);
        if self.notes.remove(id).is_none() {
            debug!("event=note_delete module=store status=skipped reason=not_found note_id={id}");
            return false;
        }
        info!(
            "event=note_delete module=store status=ok note_id={id} count={}",
            self.notes.len()
        );
        self.persist("delete");
        true
    }

    /// Moves the note at collection index `from` to index `to`.
    ///
    /// Equal or out-of-range indices are a no-op returning `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if !self.notes.move_note(from, to) {
            debug!("event=note_reorder module=store status=skipped from={from} to={to}");
            return false;
        }
        info!("event=note_reorder module=store status=ok from={from} to={to}");
        self.persist("reorder");
        true
    }

    /// Reorders using indices into the view filtered by `query`.
    ///
    /// The dragged note (view index `from`) takes the collection slot of the
    /// drop target (view index `to`). Hidden notes keep their relative order.
    pub fn reorder_in_view(&mut self, query: &str, from: usize, to: usize) -> bool {
        let view = self.notes.view_indices(query);
        match (view.get(from), view.get(to)) {
            (Some(&from_index), Some(&to_index)) => self.reorder(from_index, to_index),
            _ => {
                debug!(
                    "event=note_reorder module=store status=skipped reason=out_of_view from={from} to={to} visible={}",
                    view.len()
                );
                false
            }
        }
    }

    /// Merges externally supplied note records into the collection.
    ///
    /// Non-array payloads are rejected with the collection untouched.
    /// Entries without an id, or whose id already exists, are skipped;
    /// survivors are prepended in payload order.
    pub fn import_merge(&mut self, payload: Value) -> Result<ImportReport, ImportError> {
        let decoded = match decode_value(payload, self.clock.now_ms()) {
            Ok(decoded) => decoded,
            Err(err) => return Err(self.reject_import(err)),
        };

        let offered = decoded.notes.len();
        let added = self.notes.merge_front(decoded.notes).len();
        let report = ImportReport {
            added,
            skipped: decoded.skipped + (offered - added),
        };
        info!(
            "event=notes_import module=store status=ok added={} skipped={} count={}",
            report.added,
            report.skipped,
            self.notes.len()
        );
        self.persist("import");
        self.notices.push(Notice::Imported {
            added: report.added,
            skipped: report.skipped,
        });
        Ok(report)
    }

    /// Parses `text` as JSON and imports it with [`Self::import_merge`].
    pub fn import_json(&mut self, text: &str) -> Result<ImportReport, ImportError> {
        match serde_json::from_str::<Value>(text) {
            Ok(payload) => self.import_merge(payload),
            Err(err) => Err(self.reject_import(ImportError::InvalidJson(err.to_string()))),
        }
    }

    /// Serializes the whole collection as pretty-printed JSON.
    pub fn export_all(&self) -> serde_json::Result<String> {
        let text = encode_notes_pretty(self.notes.as_slice())?;
        info!(
            "event=notes_export module=store status=ok count={}",
            self.notes.len()
        );
        Ok(text)
    }

    /// Removes every note and every pending autosave, then persists.
    pub fn clear(&mut self) -> usize {
        self.autosave.cancel_all();
        let dropped = self.notes.clear();
        info!("event=notes_clear module=store status=ok dropped={dropped}");
        self.persist("clear");
        dropped
    }

    /// Notes whose content contains `query`, case-insensitively.
    ///
    /// Empty queries return every note. Never touches storage.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        self.notes.filter(query)
    }

    /// Stages typed content for `id`; the write happens once the quiet
    /// period elapses and [`Self::flush_due_edits`] runs.
    ///
    /// Returns `false` for unknown ids.
    pub fn stage_edit(&mut self, id: &str, content: impl Into<String>) -> bool {
        if self.notes.get(id).is_none() {
            return false;
        }
        let due_at_ms = self.autosave.stage(id, content, self.clock.now_ms());
        debug!("event=autosave_stage module=store status=ok note_id={id} due_at_ms={due_at_ms}");
        true
    }

    /// Writes staged edits whose quiet period has elapsed.
    ///
    /// Returns how many notes were updated.
    pub fn flush_due_edits(&mut self) -> usize {
        let due = self.autosave.take_due(self.clock.now_ms());
        self.apply_edits(due)
    }

    /// Writes every staged edit immediately, e.g. before shutdown.
    pub fn flush_all_edits(&mut self) -> usize {
        let pending = self.autosave.take_all();
        self.apply_edits(pending)
    }

    /// Staged edits not yet written.
    pub fn pending_edits(&self) -> &AutosaveQueue {
        &self.autosave
    }

    /// Notices queued since the last drain, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn apply_edits(&mut self, edits: Vec<(NoteId, String)>) -> usize {
        edits
            .into_iter()
            .filter(|(id, content)| self.update(id, NotePatch::content(content.as_str())).is_some())
            .count()
    }

    fn reject_import(&mut self, err: ImportError) -> ImportError {
        warn!("event=notes_import module=store status=error error={err}");
        self.notices.push(Notice::ImportRejected {
            message: err.to_string(),
        });
        err
    }

    fn persist(&mut self, operation: &'static str) {
        if let Err(err) = self.repo.save_notes(self.notes.as_slice()) {
            error!(
                "event=store_save module=store status=error operation={operation} count={} error={err}",
                self.notes.len()
            );
            self.notices.push(Notice::StorageWriteFailed {
                operation,
                message: err.to_string(),
            });
        }
    }
}
