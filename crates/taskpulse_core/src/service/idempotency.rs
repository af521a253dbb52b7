//! Duplicate-submission guard for note creation.
//!
//! # Responsibility
//! - Answer "was this (person, client id) submission already recorded?"
//!   before the caller inserts a new note.
//!
//! # Invariants
//! - The guard is read-only; check-then-insert must run inside one caller
//!   transaction to close the concurrent-retry race.
//! - `NotSeen` is an expected outcome, never an error.

use uuid::Uuid;

use crate::model::note::{NoteId, PersonId, TaskId};
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoResult;

/// Outcome of a duplicate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCheck {
    /// The correlation id was already recorded; the prior note is returned.
    Duplicate { task_id: TaskId, note_id: NoteId },
    /// First sighting of this correlation id for this person.
    NotSeen,
}

impl DuplicateCheck {
    /// Returns whether the submission is a resend.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Idempotency guard over the note stream repository.
pub struct IdempotencyGuard<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> IdempotencyGuard<R> {
    /// Creates a guard using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Checks one submission for a prior note with the same correlation id.
    pub fn check(&self, person_id: PersonId, client_id: Uuid) -> RepoResult<DuplicateCheck> {
        let found = self.repo.find_by_client_id(person_id, client_id)?;
        Ok(match found {
            Some((task_id, note_id)) => DuplicateCheck::Duplicate { task_id, note_id },
            None => DuplicateCheck::NotSeen,
        })
    }

    /// Returns all (task, note) pairs already recorded for the given
    /// correlation ids.
    pub fn check_batch(&self, client_ids: &[Uuid]) -> RepoResult<Vec<(TaskId, NoteId)>> {
        self.repo.bulk_find_by_client_ids(client_ids)
    }
}
