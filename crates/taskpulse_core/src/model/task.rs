//! Task header model.
//!
//! # Responsibility
//! - Carry the shared (viewer-independent) task fields used by list
//!   aggregation.
//!
//! # Invariants
//! - Headers are read-only to this core; the task registry owns mutation.

use serde::{Deserialize, Serialize};

use crate::model::note::{PersonId, TaskId};

/// Shared task header, identical for every viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHeader {
    pub id: TaskId,
    /// Template/form the task was created from, if any.
    pub form_id: Option<i64>,
    pub author_id: PersonId,
    /// Creation instant in epoch milliseconds.
    pub created_at: i64,
}
