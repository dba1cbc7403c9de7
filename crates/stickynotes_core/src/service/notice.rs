//! User-visible notifications queued by the note store.

use std::fmt::{Display, Formatter};

/// Something the presentation layer should show the user.
///
/// Storage failures never escape the store as errors; they arrive here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Stored notes could not be read; the store started empty.
    StorageReadFailed { message: String },
    /// A mutation was applied in memory but could not be persisted.
    StorageWriteFailed {
        operation: &'static str,
        message: String,
    },
    /// An import finished.
    Imported { added: usize, skipped: usize },
    /// An import payload was rejected as a whole.
    ImportRejected { message: String },
}

impl Notice {
    /// Whether the notice reports a failure.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Imported { .. })
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageReadFailed { message } => {
                write!(f, "Unable to load saved notes ({message}); starting empty.")
            }
            Self::StorageWriteFailed { message, .. } => write!(
                f,
                "Unable to save notes: storage may be full or blocked ({message})."
            ),
            Self::Imported { added, skipped: 0 } => write!(f, "Imported {added} new notes."),
            Self::Imported { added, skipped } => {
                write!(f, "Imported {added} new notes ({skipped} skipped).")
            }
            Self::ImportRejected { message } => {
                write!(f, "Import failed: invalid JSON structure ({message}).")
            }
        }
    }
}
