//! Attachment model.
//!
//! # Responsibility
//! - Represent a file bound to a task, optionally pinned to one note.
//!
//! # Invariants
//! - `note_id == None` means task-level attachment.
//! - When `note_id` is set, the referenced note belongs to `task_id`.

use serde::{Deserialize, Serialize};

use crate::model::note::{NoteId, TaskId};

/// File attached to a task or to a single note within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub task_id: TaskId,
    /// Owning note, or `None` for a task-level attachment.
    pub note_id: Option<NoteId>,
    pub name: String,
    pub size_bytes: i64,
}

impl Attachment {
    /// Returns whether this attachment hangs on the task itself.
    pub fn is_task_level(&self) -> bool {
        self.note_id.is_none()
    }
}
