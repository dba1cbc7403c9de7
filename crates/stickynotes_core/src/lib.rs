//! Core domain logic for sticky notes.
//!
//! The [`NoteStore`] is the single owner of note state: presentation layers
//! call its operations and re-render from [`NoteStore::notes`]. Every
//! mutation persists the whole collection through a [`NoteRepository`].

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::collection::NoteCollection;
pub use model::note::{Note, NoteColor, NoteId, NotePatch, UnknownColor};
pub use model::record::{DecodedRecords, ImportError};
pub use repo::blob_repo::{
    BlobRepository, InMemoryBlobRepository, RepoError, RepoResult, SqliteBlobRepository,
};
pub use repo::note_repo::{BlobNoteRepository, NoteRepository, DEFAULT_STORAGE_KEY};
pub use service::autosave::{AutosaveQueue, PendingEdit, DEFAULT_AUTOSAVE_DELAY};
pub use service::export::{export_file_name, today_export_file_name};
pub use service::note_store::{ImportReport, NoteStore, StoreOptions};
pub use service::notice::Notice;
pub use sync::{StubSyncProvider, SyncConfig, SyncError, SyncProvider, SyncState, SyncStatus};

/// Note store persisting to an SQLite-backed blob repository.
pub type SqliteNoteStore<C = SystemClock> = NoteStore<BlobNoteRepository<SqliteBlobRepository>, C>;

/// Opens (creating if needed) the notes database at `path` under
/// `storage_key` and loads a store from it.
pub fn open_sqlite_store(
    path: impl AsRef<std::path::Path>,
    storage_key: &str,
    options: StoreOptions,
) -> RepoResult<SqliteNoteStore> {
    let conn = db::open_db(path)?;
    let blobs = SqliteBlobRepository::try_new(conn)?;
    Ok(NoteStore::open_with(
        BlobNoteRepository::with_key(blobs, storage_key),
        SystemClock,
        options,
    ))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
