//! Note domain model.
//!
//! # Responsibility
//! - Define the immutable note record carried through digest and list
//!   aggregation paths.
//!
//! # Invariants
//! - `id` is assigned by storage, strictly increasing system-wide, and never
//!   reused for another note.
//! - A note never changes after creation; edits produce a new `version`.

use serde::{Deserialize, Serialize};

/// Globally ordered note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Task identifier owned by the external task registry.
pub type TaskId = i64;

/// Person identifier owned by the account system.
pub type PersonId = i64;

/// One entry in a task's chronological note stream.
///
/// The three description variants serve different render targets: `constant`
/// is the canonical body, `private` is visible to the author's organization
/// only, and `filterable` feeds list filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Storage-assigned id, strictly increasing system-wide.
    pub id: NoteId,
    /// Parent task; never changes.
    pub task_id: TaskId,
    /// Author person id.
    pub author_id: PersonId,
    /// Creation instant in epoch milliseconds.
    pub created_at: i64,
    /// Canonical body text.
    pub constant_text: String,
    /// Organization-private body text.
    pub private_text: String,
    /// Text projection used by list filters.
    pub filterable_text: String,
    /// Optional edit revision counter.
    pub version: Option<i64>,
}

/// Note payload before storage assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub task_id: TaskId,
    pub author_id: PersonId,
    pub created_at: i64,
    pub constant_text: String,
    pub private_text: String,
    pub filterable_text: String,
    pub version: Option<i64>,
}

impl NewNote {
    /// Creates a note payload with empty private/filterable projections.
    pub fn new(task_id: TaskId, author_id: PersonId, created_at: i64, body: impl Into<String>) -> Self {
        Self {
            task_id,
            author_id,
            created_at,
            constant_text: body.into(),
            private_text: String::new(),
            filterable_text: String::new(),
            version: None,
        }
    }
}
