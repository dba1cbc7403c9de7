//! Ordered note collection.
//!
//! # Responsibility
//! - Hold notes in display order (newest first by default).
//! - Apply structural edits and keep `position` in sync with order.
//!
//! # Invariants
//! - Ids are unique within the collection.
//! - After every structural edit, `notes[i].position == i`.

use crate::model::note::{Note, NoteId, NotePatch};
use std::collections::HashSet;

/// In-memory ordered collection of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a collection from decoded storage records.
    ///
    /// Notes are stably ordered by their stored `position`, then positions
    /// are re-derived so gaps and duplicates from older payloads disappear.
    pub fn from_stored(mut notes: Vec<Note>) -> Self {
        notes.sort_by_key(|note| note.position);
        let mut collection = Self { notes };
        collection.sync_positions();
        collection
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    /// Inserts a note at the front (newest first).
    pub fn insert_front(&mut self, note: Note) {
        self.notes.insert(0, note);
        self.sync_positions();
    }

    /// Merges `patch` into the note with `id`. Returns `None` when absent.
    pub fn update(&mut self, id: &str, patch: &NotePatch, now_ms: i64) -> Option<&Note> {
        let note = self.notes.iter_mut().find(|note| note.id == id)?;
        note.apply(patch, now_ms);
        Some(&*note)
    }

    /// Removes the note with `id`. Returns the removed note, if any.
    pub fn remove(&mut self, id: &str) -> Option<Note> {
        let index = self.index_of(id)?;
        let removed = self.notes.remove(index);
        self.sync_positions();
        Some(removed)
    }

    /// Moves the note at `from` so that it ends up at index `to`.
    ///
    /// Returns `false` without touching order when the indices are equal or
    /// either one is out of range.
    pub fn move_note(&mut self, from: usize, to: usize) -> bool {
        let len = self.notes.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let note = self.notes.remove(from);
        self.notes.insert(to, note);
        self.sync_positions();
        true
    }

    /// Prepends incoming notes whose ids are not already present.
    ///
    /// Incoming order is preserved ahead of the existing notes. Returns the
    /// ids that were added.
    pub fn merge_front(&mut self, incoming: Vec<Note>) -> Vec<NoteId> {
        let existing: HashSet<&str> = self.notes.iter().map(|note| note.id.as_str()).collect();
        let survivors: Vec<Note> = incoming
            .into_iter()
            .filter(|note| !existing.contains(note.id.as_str()))
            .collect();
        let added = survivors.iter().map(|note| note.id.clone()).collect();

        if !survivors.is_empty() {
            let previous = std::mem::take(&mut self.notes);
            self.notes = survivors;
            self.notes.extend(previous);
            self.sync_positions();
        }
        added
    }

    /// Removes every note. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.notes.len();
        self.notes.clear();
        dropped
    }

    /// Collection indices of the notes visible under `query`, in order.
    ///
    /// Matching is a trimmed, case-insensitive substring test on content;
    /// an empty query shows every note.
    pub fn view_indices(&self, query: &str) -> Vec<usize> {
        let needle = normalize_query(query);
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.matches(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    /// Notes visible under `query`, in collection order.
    pub fn filter(&self, query: &str) -> Vec<&Note> {
        let needle = normalize_query(query);
        self.notes
            .iter()
            .filter(|note| note.matches(&needle))
            .collect()
    }

    fn sync_positions(&mut self) {
        for (index, note) in self.notes.iter_mut().enumerate() {
            note.position = index;
        }
    }
}

/// Lowercases and trims a search query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::NoteCollection;
    use crate::model::note::{Note, NoteColor, NotePatch};

    fn note(id: &str, content: &str) -> Note {
        Note::with_id(id, content, NoteColor::Yellow, 1)
    }

    fn ids(collection: &NoteCollection) -> Vec<&str> {
        collection
            .as_slice()
            .iter()
            .map(|note| note.id.as_str())
            .collect()
    }

    fn assert_positions_match_order(collection: &NoteCollection) {
        for (index, note) in collection.as_slice().iter().enumerate() {
            assert_eq!(note.position, index, "note {} out of position", note.id);
        }
    }

    #[test]
    fn insert_front_keeps_newest_first() {
        let mut collection = NoteCollection::new();
        collection.insert_front(note("a", "first"));
        collection.insert_front(note("b", "second"));
        assert_eq!(ids(&collection), ["b", "a"]);
        assert_positions_match_order(&collection);
    }

    #[test]
    fn from_stored_orders_by_position_and_closes_gaps() {
        let mut a = note("a", "");
        a.position = 7;
        let mut b = note("b", "");
        b.position = 2;
        let c = note("c", "");
        let collection = NoteCollection::from_stored(vec![a, b, c]);
        assert_eq!(ids(&collection), ["c", "b", "a"]);
        assert_positions_match_order(&collection);
    }

    #[test]
    fn move_note_ignores_equal_and_out_of_range_indices() {
        let mut collection = NoteCollection::from_stored(vec![note("a", ""), note("b", "")]);
        assert!(!collection.move_note(1, 1));
        assert!(!collection.move_note(0, 2));
        assert!(!collection.move_note(5, 0));
        assert_eq!(ids(&collection), ["a", "b"]);

        assert!(collection.move_note(0, 1));
        assert_eq!(ids(&collection), ["b", "a"]);
        assert_positions_match_order(&collection);
    }

    #[test]
    fn remove_unknown_id_leaves_collection_unchanged() {
        let mut collection = NoteCollection::from_stored(vec![note("a", ""), note("b", "")]);
        let before = collection.clone();
        assert!(collection.remove("missing").is_none());
        assert_eq!(collection, before);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut collection = NoteCollection::from_stored(vec![note("a", "hi")]);
        assert!(collection
            .update("missing", &NotePatch::content("x"), 5)
            .is_none());
        assert_eq!(collection.get("a").map(|n| n.content.as_str()), Some("hi"));
    }

    #[test]
    fn merge_front_skips_existing_ids_and_preserves_incoming_order() {
        let mut collection = NoteCollection::from_stored(vec![note("a", "old")]);
        let added = collection.merge_front(vec![
            note("a", "collision"),
            note("x", "new one"),
            note("y", "new two"),
        ]);
        assert_eq!(added, ["x", "y"]);
        assert_eq!(ids(&collection), ["x", "y", "a"]);
        assert_eq!(collection.get("a").map(|n| n.content.as_str()), Some("old"));
        assert_positions_match_order(&collection);
    }

    #[test]
    fn filter_is_case_insensitive_and_empty_query_shows_all() {
        let collection =
            NoteCollection::from_stored(vec![note("a", "Hi there"), note("b", "bye")]);
        let hits: Vec<&str> = collection
            .filter("  hI ")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(hits, ["a"]);
        assert_eq!(collection.filter("").len(), 2);
        assert_eq!(collection.view_indices("bye"), [1]);
    }

    #[test]
    fn positions_track_order_across_mixed_edits() {
        let mut collection = NoteCollection::new();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        for step in 0..500 {
            match next() % 3 {
                0 => collection.insert_front(note(&format!("n{step}"), "")),
                1 if !collection.is_empty() => {
                    let index = (next() as usize) % collection.len();
                    let id = collection.as_slice()[index].id.clone();
                    collection.remove(&id);
                }
                _ if !collection.is_empty() => {
                    let len = collection.len();
                    collection.move_note((next() as usize) % len, (next() as usize) % len);
                }
                _ => {}
            }
            assert_positions_match_order(&collection);
        }
    }
}
