//! Task list aggregation.
//!
//! # Responsibility
//! - Materialize one denormalized `TaskListEntry` per requested task using a
//!   bounded number of bulk fetches and in-memory regrouping.
//!
//! # Invariants
//! - Output preserves the caller-supplied task id order and length.
//! - Extended detail issues exactly three related-data bulk fetches (notes,
//!   attachments, drafts) regardless of task count.
//! - An empty task id list returns without touching the repository.
//! - A requested task id without a stored header aborts the whole call;
//!   silently dropping a position would desync paged callers.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use log::info;

use crate::model::attachment::Attachment;
use crate::model::draft::Draft;
use crate::model::note::{Note, NoteId, PersonId, TaskId};
use crate::model::task_list::{
    DetailLevel, ListMode, Loaded, NoteView, PersonalHeader, TaskListEntry,
};
use crate::repo::task_list_repo::TaskListRepository;
use crate::repo::RepoError;

/// Parameters of one list materialization call.
///
/// The caller guarantees `task_ids` contains no duplicates and only ids
/// known to the task registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub mode: ListMode,
    pub detail: DetailLevel,
    pub viewer_id: PersonId,
    pub task_ids: Vec<TaskId>,
}

/// Aggregation failure.
#[derive(Debug)]
pub enum AggregateError {
    /// Caller passed a task id the store does not know. Contract violation.
    UnknownTask(TaskId),
    /// A mode-specific entry point was invoked with the wrong list mode.
    /// Contract violation.
    ModeMismatch {
        expected: ListMode,
        actual: ListMode,
    },
    /// Repository failure, propagated unchanged.
    Repo(RepoError),
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(task_id) => {
                write!(f, "no stored header for requested task {task_id}")
            }
            Self::ModeMismatch { expected, actual } => {
                write!(f, "list mode mismatch: expected {expected:?}, got {actual:?}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AggregateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AggregateError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// List aggregator over the bulk-fetch repository.
pub struct TaskListAggregator<R: TaskListRepository> {
    repo: R,
}

impl<R: TaskListRepository> TaskListAggregator<R> {
    /// Creates an aggregator using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Announcement-listing entry point; fails fast on any other mode.
    pub fn assemble_announcements(
        &self,
        request: &ListRequest,
    ) -> Result<Vec<TaskListEntry>, AggregateError> {
        if request.mode != ListMode::Announcements {
            return Err(AggregateError::ModeMismatch {
                expected: ListMode::Announcements,
                actual: request.mode,
            });
        }
        self.assemble(request)
    }

    /// Materializes one entry per requested task, in request order.
    pub fn assemble(&self, request: &ListRequest) -> Result<Vec<TaskListEntry>, AggregateError> {
        if request.task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids = request.task_ids.as_slice();
        let headers = self.repo.fetch_headers(task_ids)?;
        let personal_rows = self.repo.fetch_user_tasks(task_ids, request.viewer_id)?;
        let followers = self.repo.fetch_followers(task_ids)?;

        let extended = request.detail == DetailLevel::Extended;
        let mut notes = if extended {
            self.repo.fetch_notes_grouped(task_ids)?
        } else {
            HashMap::new()
        };
        let mut attachments = if extended {
            self.repo.fetch_attachments_grouped(task_ids)?
        } else {
            HashMap::new()
        };
        let mut drafts = if extended {
            self.repo.fetch_drafts_grouped(task_ids, request.viewer_id)?
        } else {
            HashMap::new()
        };

        let mut entries = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            let header = headers
                .get(&task_id)
                .cloned()
                .ok_or(AggregateError::UnknownTask(task_id))?;

            let followed = followers
                .get(&task_id)
                .is_some_and(|set| set.contains(&request.viewer_id));
            let personal = match personal_rows.get(&task_id) {
                Some(row) => PersonalHeader {
                    task_id,
                    person_id: request.viewer_id,
                    last_read_note_id: row.last_read_note_id,
                    last_comment_note_id: row.last_comment_note_id,
                    category: row.category,
                    plan_date: row.plan_date,
                    followed,
                },
                None => PersonalHeader {
                    task_id,
                    person_id: request.viewer_id,
                    last_read_note_id: 0,
                    last_comment_note_id: 0,
                    category: None,
                    plan_date: None,
                    followed,
                },
            };

            let entry = if extended {
                let task_notes = notes.remove(&task_id).unwrap_or_default();
                let task_attachments = attachments.remove(&task_id).unwrap_or_default();
                let (task_level, note_views) = split_attachments(task_notes, task_attachments);
                let latest = latest_draft(drafts.remove(&task_id).unwrap_or_default());

                TaskListEntry {
                    header,
                    personal,
                    notes: Loaded::Loaded(note_views),
                    attachments: Loaded::Loaded(task_level),
                    draft: Loaded::Loaded(latest),
                }
            } else {
                TaskListEntry {
                    header,
                    personal,
                    notes: Loaded::NotLoaded,
                    attachments: Loaded::NotLoaded,
                    draft: Loaded::NotLoaded,
                }
            };

            entries.push(entry);
        }

        info!(
            "event=task_list_assemble module=task_list status=ok viewer={} tasks={} detail={:?}",
            request.viewer_id,
            entries.len(),
            request.detail
        );
        Ok(entries)
    }
}

/// Splits one task's attachments into the task-level group and per-note
/// groups attached to their owning notes.
fn split_attachments(
    task_notes: Vec<Note>,
    task_attachments: Vec<Attachment>,
) -> (Vec<Attachment>, Vec<NoteView>) {
    let mut task_level = Vec::new();
    let mut by_note: HashMap<NoteId, Vec<Attachment>> = HashMap::new();
    for attachment in task_attachments {
        match attachment.note_id {
            None => task_level.push(attachment),
            Some(note_id) => by_note.entry(note_id).or_default().push(attachment),
        }
    }

    let note_views: Vec<NoteView> = task_notes
        .into_iter()
        .map(|note| {
            let attachments = by_note.remove(&note.id).unwrap_or_default();
            NoteView { note, attachments }
        })
        .collect();

    // An attachment pointing at a note outside this task's thread is bad
    // persisted state; surface it under the task rather than losing it.
    let mut orphaned: Vec<Attachment> = by_note.into_values().flatten().collect();
    orphaned.sort_by_key(|attachment| attachment.id);
    task_level.extend(orphaned);

    (task_level, note_views)
}

/// Picks the most recent draft by `updated_at`; on equal timestamps the
/// later element encountered wins.
fn latest_draft(drafts: Vec<Draft>) -> Option<Draft> {
    drafts.into_iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.updated_at < current.updated_at => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::{latest_draft, split_attachments};
    use crate::model::attachment::Attachment;
    use crate::model::draft::Draft;
    use crate::model::note::Note;

    fn draft(id: i64, updated_at: i64) -> Draft {
        Draft {
            id,
            task_id: 1,
            note_id: None,
            person_id: 5,
            text: String::new(),
            updated_at,
            is_deleted: false,
        }
    }

    #[test]
    fn latest_draft_picks_max_timestamp() {
        let picked = latest_draft(vec![draft(1, 1_000), draft(2, 3_000), draft(3, 2_000)]);
        assert_eq!(picked.map(|value| value.id), Some(2));
    }

    #[test]
    fn latest_draft_prefers_later_element_on_tie() {
        let picked = latest_draft(vec![draft(1, 2_000), draft(2, 2_000)]);
        assert_eq!(picked.map(|value| value.id), Some(2));
    }

    #[test]
    fn latest_draft_of_empty_input_is_none() {
        assert_eq!(latest_draft(Vec::new()), None);
    }

    fn note(id: i64) -> Note {
        Note {
            id,
            task_id: 1,
            author_id: 5,
            created_at: 1_000,
            constant_text: String::new(),
            private_text: String::new(),
            filterable_text: String::new(),
            version: None,
        }
    }

    fn attachment(id: i64, note_id: Option<i64>) -> Attachment {
        Attachment {
            id,
            task_id: 1,
            note_id,
            name: format!("file-{id}.txt"),
            size_bytes: 16,
        }
    }

    #[test]
    fn attachment_referencing_foreign_note_falls_back_to_task_level() {
        let notes = vec![note(10)];
        let attachments = vec![
            attachment(1, None),
            attachment(2, Some(10)),
            attachment(3, Some(999)),
        ];

        let (task_level, note_views) = split_attachments(notes, attachments);

        let task_level_ids: Vec<i64> = task_level.iter().map(|value| value.id).collect();
        assert_eq!(task_level_ids, vec![1, 3]);
        assert_eq!(note_views.len(), 1);
        assert_eq!(note_views[0].attachments.len(), 1);
        assert_eq!(note_views[0].attachments[0].id, 2);
    }
}
