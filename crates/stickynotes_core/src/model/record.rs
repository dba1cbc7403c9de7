//! Lenient JSON record codec shared by storage load and file import.
//!
//! # Responsibility
//! - Turn an untrusted JSON payload into validated `Note` values.
//! - Encode a collection back to the persisted/exported array shape.
//!
//! # Invariants
//! - Only a top-level JSON array is accepted.
//! - Entries are judged individually: one bad entry never rejects the rest.
//! - An entry without a non-empty string `id` is skipped.
//! - Duplicate ids inside one payload keep the first occurrence.

use crate::model::note::{Note, NoteColor};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Whole-payload format failure for stored blobs and import files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("expected a JSON array of notes, found {0}")]
    NotAnArray(&'static str),
}

/// Outcome of decoding one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRecords {
    /// Accepted notes in payload order.
    pub notes: Vec<Note>,
    /// Entries dropped as malformed, id-less or duplicated.
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: Option<String>,
    content: Option<String>,
    color: Option<String>,
    created_at: Option<i64>,
    updated_at: Option<i64>,
    position: Option<i64>,
}

/// Parses `text` and decodes it with [`decode_value`].
pub fn parse_records(text: &str, now_ms: i64) -> Result<DecodedRecords, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| ImportError::InvalidJson(err.to_string()))?;
    decode_value(value, now_ms)
}

/// Decodes a JSON value that must be an array of note-shaped objects.
///
/// Missing fields are filled in: empty content, default color, `now_ms`
/// timestamps, position 0. An unknown color falls back to the default.
/// Notes keep their stored `position` so callers can restore order; it is
/// not yet normalized.
pub fn decode_value(value: Value, now_ms: i64) -> Result<DecodedRecords, ImportError> {
    let entries = match value {
        Value::Array(entries) => entries,
        other => return Err(ImportError::NotAnArray(json_kind(&other))),
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut decoded = DecodedRecords::default();
    for entry in entries {
        match decode_entry(entry, now_ms) {
            Some(note) if seen.insert(note.id.clone()) => decoded.notes.push(note),
            _ => decoded.skipped += 1,
        }
    }
    Ok(decoded)
}

/// Encodes notes as a compact JSON array.
pub fn encode_notes(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string(notes)
}

/// Encodes notes as a pretty-printed JSON array (two-space indent).
pub fn encode_notes_pretty(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(notes)
}

fn decode_entry(entry: Value, now_ms: i64) -> Option<Note> {
    if !entry.is_object() {
        return None;
    }
    let raw: RawRecord = serde_json::from_value(entry).ok()?;
    let id = raw.id.filter(|id| !id.is_empty())?;
    let color = raw
        .color
        .and_then(|name| name.parse::<NoteColor>().ok())
        .unwrap_or_default();
    let created_at = raw.created_at.unwrap_or(now_ms);

    Some(Note {
        id,
        content: raw.content.unwrap_or_default(),
        color,
        created_at,
        updated_at: raw.updated_at.unwrap_or(created_at),
        position: usize::try_from(raw.position.unwrap_or(0)).unwrap_or(0),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
