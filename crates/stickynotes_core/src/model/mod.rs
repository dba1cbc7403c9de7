//! Domain model for sticky notes.
//!
//! # Responsibility
//! - Define the note record and its color tag.
//! - Own the ordered collection and its position invariant.
//!
//! # Invariants
//! - Every note is identified by a stable, immutable `NoteId`.
//! - `position` always equals the note's index in its collection.

pub mod collection;
pub mod note;
pub mod record;
