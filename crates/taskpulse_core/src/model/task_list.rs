//! Task list aggregation output model.
//!
//! # Responsibility
//! - Define the denormalized per-viewer list entry and its detail tagging.
//!
//! # Invariants
//! - `Loaded::NotLoaded` means "not fetched in this call", which is distinct
//!   from `Loaded(empty)`; presentation layers must not conflate the two.
//! - Entry order always matches the caller-supplied task id order.

use serde::{Deserialize, Serialize};

use crate::model::attachment::Attachment;
use crate::model::draft::Draft;
use crate::model::note::{Note, NoteId, PersonId, TaskId};
use crate::model::task::TaskHeader;

/// Listing flavor requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    /// Announcement stream listing.
    Announcements,
    /// Personal folder listing.
    Folder,
}

/// How much related data to materialize per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    /// Headers only; notes/attachments/draft stay `NotLoaded`.
    Summary,
    /// Notes, attachments and latest draft are fetched and attached.
    Extended,
}

/// Fetch-state tag for optional related collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum Loaded<T> {
    /// The call did not fetch this data.
    NotLoaded,
    /// Fetched; may legitimately be empty.
    Loaded(T),
}

impl<T> Loaded<T> {
    /// Returns the loaded value, if any.
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Self::NotLoaded => None,
            Self::Loaded(value) => Some(value),
        }
    }

    /// Returns whether the call materialized this data.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Viewer-specific slice of one list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalHeader {
    pub task_id: TaskId,
    pub person_id: PersonId,
    /// Highest note id the viewer has read.
    pub last_read_note_id: NoteId,
    /// Highest note id attributed to the viewer as acknowledged comment.
    pub last_comment_note_id: NoteId,
    pub category: Option<i64>,
    pub plan_date: Option<i64>,
    /// Whether the viewer follows this task.
    pub followed: bool,
}

/// One note together with its note-level attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteView {
    pub note: Note,
    pub attachments: Vec<Attachment>,
}

/// Fully assembled, per-viewer list entry for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListEntry {
    pub header: TaskHeader,
    pub personal: PersonalHeader,
    /// Task notes in id order; `NotLoaded` in summary mode.
    pub notes: Loaded<Vec<NoteView>>,
    /// Task-level attachments only; note-level ones live on `NoteView`.
    pub attachments: Loaded<Vec<Attachment>>,
    /// Most recent draft for this task, if any.
    pub draft: Loaded<Option<Draft>>,
}

#[cfg(test)]
mod tests {
    use super::Loaded;

    #[test]
    fn not_loaded_is_distinct_from_loaded_empty() {
        let absent: Loaded<Vec<i64>> = Loaded::NotLoaded;
        let empty: Loaded<Vec<i64>> = Loaded::Loaded(Vec::new());

        assert!(!absent.is_loaded());
        assert!(empty.is_loaded());
        assert_ne!(absent, empty);
        assert_eq!(empty.as_loaded().map(Vec::len), Some(0));
    }
}
