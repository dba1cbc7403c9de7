//! Note snapshot repository on top of a blob backend.
//!
//! # Responsibility
//! - Serialize the whole note collection under one storage key.
//! - Decode stored payloads leniently on load.
//!
//! # Invariants
//! - Saved payloads are compact JSON arrays of notes.
//! - A missing key loads as `Ok(None)`; a corrupt payload is an error the
//!   caller decides how to recover from.

use crate::model::note::Note;
use crate::model::record::{encode_notes, parse_records, DecodedRecords};
use crate::repo::blob_repo::{BlobRepository, RepoError, RepoResult};

/// Storage key shared with previously exported and stored payloads.
pub const DEFAULT_STORAGE_KEY: &str = "sticky-notes:v1";

/// Snapshot persistence contract for the note store.
pub trait NoteRepository {
    /// Loads the stored collection. `Ok(None)` when nothing was saved yet.
    ///
    /// `now_ms` fills in timestamps missing from older payloads.
    fn load_notes(&self, now_ms: i64) -> RepoResult<Option<DecodedRecords>>;
    /// Replaces the stored collection.
    fn save_notes(&mut self, notes: &[Note]) -> RepoResult<()>;
}

/// [`NoteRepository`] that stores the collection as one blob.
pub struct BlobNoteRepository<B: BlobRepository> {
    blobs: B,
    key: String,
}

impl<B: BlobRepository> BlobNoteRepository<B> {
    pub fn new(blobs: B) -> Self {
        Self::with_key(blobs, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn into_inner(self) -> B {
        self.blobs
    }
}

impl<B: BlobRepository> NoteRepository for BlobNoteRepository<B> {
    fn load_notes(&self, now_ms: i64) -> RepoResult<Option<DecodedRecords>> {
        let Some(raw) = self.blobs.get(&self.key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse_records(&raw, now_ms)
            .map(Some)
            .map_err(|source| RepoError::InvalidPayload {
                key: self.key.clone(),
                source,
            })
    }

    fn save_notes(&mut self, notes: &[Note]) -> RepoResult<()> {
        let payload = encode_notes(notes)?;
        self.blobs.put(&self.key, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobNoteRepository, NoteRepository, DEFAULT_STORAGE_KEY};
    use crate::model::note::{Note, NoteColor};
    use crate::repo::blob_repo::{BlobRepository, InMemoryBlobRepository, RepoError};

    #[test]
    fn missing_or_blank_key_loads_as_none() {
        let repo = BlobNoteRepository::new(InMemoryBlobRepository::new());
        assert!(repo.load_notes(0).expect("load").is_none());

        let blank = InMemoryBlobRepository::new().with_entry(DEFAULT_STORAGE_KEY, "  ");
        let repo = BlobNoteRepository::new(blank);
        assert!(repo.load_notes(0).expect("load").is_none());
    }

    #[test]
    fn non_array_payload_is_invalid() {
        let blobs = InMemoryBlobRepository::new().with_entry(DEFAULT_STORAGE_KEY, "{\"a\":1}");
        let repo = BlobNoteRepository::new(blobs);
        let err = repo.load_notes(0).expect_err("object payload must fail");
        assert!(matches!(err, RepoError::InvalidPayload { .. }));
    }

    #[test]
    fn save_then_load_round_trips_under_custom_key() {
        let mut repo = BlobNoteRepository::with_key(InMemoryBlobRepository::new(), "notes:test");
        let notes = vec![Note::with_id("a", "hello", NoteColor::Green, 9)];
        repo.save_notes(&notes).expect("save");

        assert!(repo
            .blobs()
            .get(DEFAULT_STORAGE_KEY)
            .expect("get")
            .is_none());
        let loaded = repo.load_notes(0).expect("load").expect("payload present");
        assert_eq!(loaded.notes, notes);
    }
}
