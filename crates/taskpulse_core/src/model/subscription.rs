//! Subscription records: announcement follows and personal task placement.
//!
//! # Responsibility
//! - Model the two distinct ways a person is linked to a task stream.
//!
//! # Invariants
//! - `UserAnnouncement::last_read_note_id == 0` is the "never read" sentinel;
//!   announcement digests only target followers still at the sentinel.
//! - `UserTask` read markers are live and move as the person reads.

use serde::{Deserialize, Serialize};

use crate::model::note::{NoteId, PersonId, TaskId};

/// Personal folder a task is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Folder {
    /// Default folder; the only one scanned for participant digests.
    Inbox,
    /// Tasks the person sent elsewhere.
    Sent,
    /// Archived, out of digest scope.
    Archive,
}

/// Announcement follow record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnnouncement {
    pub person_id: PersonId,
    pub task_id: TaskId,
    /// 0 means never read. Any other value permanently excludes the follower
    /// from announcement batching for this task.
    pub last_read_note_id: NoteId,
}

/// Per-person task placement and read state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTask {
    pub person_id: PersonId,
    pub task_id: TaskId,
    pub folder: Folder,
    /// Highest note id the person has read in this task.
    pub last_read_note_id: NoteId,
    /// Highest note id attributed to the person as acknowledged comment.
    pub last_comment_note_id: NoteId,
    /// Personal planning date, epoch milliseconds.
    pub plan_date: Option<i64>,
    /// Personal category tag.
    pub category: Option<i64>,
}
