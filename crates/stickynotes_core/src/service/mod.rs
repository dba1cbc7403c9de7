//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collection edits, persistence and autosave into one store.
//! - Keep presentation layers decoupled from storage details.

pub mod autosave;
pub mod export;
pub mod note_store;
pub mod notice;
