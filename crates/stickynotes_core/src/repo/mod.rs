//! Repository layer: key-value blob backends and the note snapshot codec.
//!
//! # Responsibility
//! - Define the blob storage contract the note store persists through.
//! - Isolate SQLite details from service orchestration.
//!
//! # Invariants
//! - A save writes the whole collection under one key; there are no deltas.
//! - Repository APIs return typed errors; recovery policy lives in services.

pub mod blob_repo;
pub mod note_repo;
