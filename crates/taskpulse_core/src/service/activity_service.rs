//! New-activity badge summarizer.
//!
//! # Responsibility
//! - Report count and most recent instant of notes created after a
//!   watermark, optionally scoped to one viewer's acknowledgement state.
//!
//! # Invariants
//! - "No qualifying activity" is an absent summary, not a zero-count one;
//!   callers must distinguish the two.

use crate::model::note::{NoteId, PersonId, TaskId};
use crate::repo::note_repo::{NewCommentSummary, NoteRepository};
use crate::repo::RepoResult;

/// Activity summarization facade over the note stream repository.
pub struct ActivityService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> ActivityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Summarizes notes created after `watermark` on one task.
    ///
    /// With a viewer, notes acknowledged on someone else's behalf are
    /// excluded; without one, every note after the watermark counts.
    pub fn new_activity(
        &self,
        task_id: TaskId,
        watermark: NoteId,
        viewer_id: Option<PersonId>,
    ) -> RepoResult<Option<NewCommentSummary>> {
        self.repo.new_comment_summary(task_id, watermark, viewer_id)
    }

    /// Returns whether the task has any unseen activity for the viewer.
    pub fn has_new_activity(
        &self,
        task_id: TaskId,
        watermark: NoteId,
        viewer_id: Option<PersonId>,
    ) -> RepoResult<bool> {
        let summary = self.new_activity(task_id, watermark, viewer_id)?;
        Ok(summary.is_some_and(|value| value.count > 0))
    }
}
