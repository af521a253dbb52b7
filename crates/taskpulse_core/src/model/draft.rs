//! Draft model.
//!
//! # Responsibility
//! - Represent a note-in-progress bound to a task (and optionally to the
//!   note being edited).
//!
//! # Invariants
//! - Several drafts may exist per task per person (one per device); list
//!   display surfaces only the most recent by `updated_at`.
//! - Deletion is a soft tombstone so device sync can converge.

use serde::{Deserialize, Serialize};

use crate::model::note::{NoteId, PersonId, TaskId};

/// Unsent note draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: i64,
    pub task_id: TaskId,
    /// Set when the draft edits an existing note.
    pub note_id: Option<NoteId>,
    pub person_id: PersonId,
    pub text: String,
    /// Last edit instant, epoch milliseconds.
    pub updated_at: i64,
    pub is_deleted: bool,
}
