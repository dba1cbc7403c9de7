//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note shape and its JSON field naming.
//! - Provide construction and patch helpers that keep timestamps honest.
//!
//! # Invariants
//! - `id` never changes after creation.
//! - `updated_at` is refreshed on every mutation and never moves backwards.
//! - `created_at == updated_at` for a freshly created note.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque note identifier.
///
/// Generated notes use UUID v4 text, but imported notes may carry any
/// non-empty string, so the id is kept as plain text.
pub type NoteId = String;

/// Color tag shown behind a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Yellow,
    Pink,
    Green,
    Blue,
}

impl NoteColor {
    /// All selectable colors in display order.
    pub const ALL: [NoteColor; 4] = [Self::Yellow, Self::Pink, Self::Green, Self::Blue];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl Display for NoteColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a color name is not one of [`NoteColor::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown note color `{0}`; expected yellow|pink|green|blue")]
pub struct UnknownColor(pub String);

impl FromStr for NoteColor {
    type Err = UnknownColor;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yellow" => Ok(Self::Yellow),
            "pink" => Ok(Self::Pink),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            other => Err(UnknownColor(other.to_string())),
        }
    }
}

/// One sticky note.
///
/// Serialized with camelCase keys to stay compatible with previously
/// exported files: `{id, content, color, createdAt, updatedAt, position}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub color: NoteColor,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Strictly increases on every mutation.
    pub updated_at: i64,
    /// Zero-based rank; owned by the collection, not by callers.
    pub position: usize,
}

impl Note {
    /// Creates a note with a freshly generated id.
    pub fn new(content: impl Into<String>, color: NoteColor, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), content, color, now_ms)
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Position starts at 0; the owning collection re-derives it on insert.
    pub fn with_id(
        id: impl Into<NoteId>,
        content: impl Into<String>,
        color: NoteColor,
        now_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            color,
            created_at: now_ms,
            updated_at: now_ms,
            position: 0,
        }
    }

    /// Merges the patch fields and refreshes `updated_at`.
    pub fn apply(&mut self, patch: &NotePatch, now_ms: i64) {
        if let Some(content) = patch.content.as_ref() {
            self.content.clone_from(content);
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        self.touch(now_ms);
    }

    /// Refreshes `updated_at`, bumping by one millisecond when the clock
    /// has not advanced past the previous value.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms.max(self.updated_at.saturating_add(1));
    }

    /// Case-insensitive substring match against content.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.content.to_lowercase().contains(needle)
    }
}

/// Partial update for mutable note fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub content: Option<String>,
    pub color: Option<NoteColor>,
}

impl NotePatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            color: None,
        }
    }

    pub fn color(color: NoteColor) -> Self {
        Self {
            content: None,
            color: Some(color),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.color.is_none()
    }
}
