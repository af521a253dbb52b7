//! Bulk-fetch repository backing task list aggregation.
//!
//! # Responsibility
//! - Fetch headers, notes, attachments, drafts, personal rows and follower
//!   sets for a whole task id set in one statement each.
//! - Return in-memory groupings keyed by task id; the aggregator performs
//!   all further redistribution without touching storage again.
//!
//! # Invariants
//! - Empty input id sets short-circuit to empty groupings with no SQL.
//! - Draft fetches exclude tombstoned rows and are scoped to one viewer.

use std::collections::{HashMap, HashSet};

use rusqlite::{params_from_iter, Connection, Row};

use crate::model::attachment::Attachment;
use crate::model::draft::Draft;
use crate::model::note::{Note, PersonId, TaskId};
use crate::model::subscription::{Folder, UserAnnouncement, UserTask};
use crate::model::task::TaskHeader;
use crate::repo::note_repo::{parse_note_row, NOTE_SELECT_SQL};
use crate::repo::{sql_placeholders, RepoError, RepoResult};

/// Repository contract for list-entry bulk fetches.
pub trait TaskListRepository {
    /// Shared headers for the given tasks, keyed by task id.
    fn fetch_headers(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, TaskHeader>>;

    /// All notes of the given tasks grouped by task, each group in id order.
    fn fetch_notes_grouped(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, Vec<Note>>>;

    /// All attachments of the given tasks grouped by task.
    fn fetch_attachments_grouped(
        &self,
        task_ids: &[TaskId],
    ) -> RepoResult<HashMap<TaskId, Vec<Attachment>>>;

    /// The viewer's live drafts for the given tasks grouped by task.
    fn fetch_drafts_grouped(
        &self,
        task_ids: &[TaskId],
        viewer_id: PersonId,
    ) -> RepoResult<HashMap<TaskId, Vec<Draft>>>;

    /// The viewer's personal rows for the given tasks, keyed by task id.
    /// Tasks without a row for the viewer are simply absent.
    fn fetch_user_tasks(
        &self,
        task_ids: &[TaskId],
        viewer_id: PersonId,
    ) -> RepoResult<HashMap<TaskId, UserTask>>;

    /// Follower sets for the given tasks, keyed by task id.
    fn fetch_followers(
        &self,
        task_ids: &[TaskId],
    ) -> RepoResult<HashMap<TaskId, HashSet<PersonId>>>;

    /// The viewer's announcement subscriptions in task id order; feeds the
    /// announcement listing entry point with its task id set.
    fn fetch_announcements(&self, viewer_id: PersonId) -> RepoResult<Vec<UserAnnouncement>>;
}

/// SQLite-backed bulk-fetch repository.
pub struct SqliteTaskListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskListRepository for SqliteTaskListRepository<'_> {
    fn fetch_headers(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, TaskHeader>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT id, form_id, author_id, created_at
             FROM tasks
             WHERE id IN ({});",
            sql_placeholders(task_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(task_ids.iter()))?;

        let mut headers = HashMap::with_capacity(task_ids.len());
        while let Some(row) = rows.next()? {
            let header = TaskHeader {
                id: row.get("id")?,
                form_id: row.get("form_id")?,
                author_id: row.get("author_id")?,
                created_at: row.get("created_at")?,
            };
            headers.insert(header.id, header);
        }
        Ok(headers)
    }

    fn fetch_notes_grouped(&self, task_ids: &[TaskId]) -> RepoResult<HashMap<TaskId, Vec<Note>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "{NOTE_SELECT_SQL}
             WHERE task_id IN ({})
             ORDER BY id ASC;",
            sql_placeholders(task_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(task_ids.iter()))?;

        let mut grouped: HashMap<TaskId, Vec<Note>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let note = parse_note_row(row)?;
            grouped.entry(note.task_id).or_default().push(note);
        }
        Ok(grouped)
    }

    fn fetch_attachments_grouped(
        &self,
        task_ids: &[TaskId],
    ) -> RepoResult<HashMap<TaskId, Vec<Attachment>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT id, task_id, note_id, name, size_bytes
             FROM attachments
             WHERE task_id IN ({})
             ORDER BY id ASC;",
            sql_placeholders(task_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(task_ids.iter()))?;

        let mut grouped: HashMap<TaskId, Vec<Attachment>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let attachment = Attachment {
                id: row.get("id")?,
                task_id: row.get("task_id")?,
                note_id: row.get("note_id")?,
                name: row.get("name")?,
                size_bytes: row.get("size_bytes")?,
            };
            grouped.entry(attachment.task_id).or_default().push(attachment);
        }
        Ok(grouped)
    }

    fn fetch_drafts_grouped(
        &self,
        task_ids: &[TaskId],
        viewer_id: PersonId,
    ) -> RepoResult<HashMap<TaskId, Vec<Draft>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT id, task_id, note_id, person_id, text, updated_at, is_deleted
             FROM drafts
             WHERE person_id = ?
               AND is_deleted = 0
               AND task_id IN ({})
             ORDER BY id ASC;",
            sql_placeholders(task_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut bind: Vec<i64> = Vec::with_capacity(task_ids.len() + 1);
        bind.push(viewer_id);
        bind.extend_from_slice(task_ids);
        let mut rows = stmt.query(params_from_iter(bind.iter()))?;

        let mut grouped: HashMap<TaskId, Vec<Draft>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let draft = parse_draft_row(row)?;
            grouped.entry(draft.task_id).or_default().push(draft);
        }
        Ok(grouped)
    }

    fn fetch_user_tasks(
        &self,
        task_ids: &[TaskId],
        viewer_id: PersonId,
    ) -> RepoResult<HashMap<TaskId, UserTask>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT person_id, task_id, folder, last_read_note_id,
                    last_comment_note_id, plan_date, category
             FROM user_tasks
             WHERE person_id = ?
               AND task_id IN ({});",
            sql_placeholders(task_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut bind: Vec<i64> = Vec::with_capacity(task_ids.len() + 1);
        bind.push(viewer_id);
        bind.extend_from_slice(task_ids);
        let mut rows = stmt.query(params_from_iter(bind.iter()))?;

        let mut personal = HashMap::new();
        while let Some(row) = rows.next()? {
            let user_task = parse_user_task_row(row)?;
            personal.insert(user_task.task_id, user_task);
        }
        Ok(personal)
    }

    fn fetch_followers(
        &self,
        task_ids: &[TaskId],
    ) -> RepoResult<HashMap<TaskId, HashSet<PersonId>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT task_id, person_id
             FROM task_followers
             WHERE task_id IN ({});",
            sql_placeholders(task_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(task_ids.iter()))?;

        let mut followers: HashMap<TaskId, HashSet<PersonId>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let task_id: TaskId = row.get(0)?;
            let person_id: PersonId = row.get(1)?;
            followers.entry(task_id).or_default().insert(person_id);
        }
        Ok(followers)
    }

    fn fetch_announcements(&self, viewer_id: PersonId) -> RepoResult<Vec<UserAnnouncement>> {
        let mut stmt = self.conn.prepare(
            "SELECT person_id, task_id, last_read_note_id
             FROM user_announcements
             WHERE person_id = ?1
             ORDER BY task_id ASC;",
        )?;
        let mut rows = stmt.query([viewer_id])?;

        let mut subscriptions = Vec::new();
        while let Some(row) = rows.next()? {
            subscriptions.push(UserAnnouncement {
                person_id: row.get(0)?,
                task_id: row.get(1)?,
                last_read_note_id: row.get(2)?,
            });
        }
        Ok(subscriptions)
    }
}

/// Storage spelling of a folder value, exposed for fixture seeding and
/// alternative backends.
pub fn folder_to_db(folder: Folder) -> &'static str {
    match folder {
        Folder::Inbox => "inbox",
        Folder::Sent => "sent",
        Folder::Archive => "archive",
    }
}

pub(crate) fn parse_folder(value: &str) -> Option<Folder> {
    match value {
        "inbox" => Some(Folder::Inbox),
        "sent" => Some(Folder::Sent),
        "archive" => Some(Folder::Archive),
        _ => None,
    }
}

fn parse_draft_row(row: &Row<'_>) -> RepoResult<Draft> {
    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in drafts.is_deleted"
            )));
        }
    };

    Ok(Draft {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        note_id: row.get("note_id")?,
        person_id: row.get("person_id")?,
        text: row.get("text")?,
        updated_at: row.get("updated_at")?,
        is_deleted,
    })
}

fn parse_user_task_row(row: &Row<'_>) -> RepoResult<UserTask> {
    let folder_text: String = row.get("folder")?;
    let folder = parse_folder(&folder_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid folder value `{folder_text}` in user_tasks.folder"
        ))
    })?;

    Ok(UserTask {
        person_id: row.get("person_id")?,
        task_id: row.get("task_id")?,
        folder,
        last_read_note_id: row.get("last_read_note_id")?,
        last_comment_note_id: row.get("last_comment_note_id")?,
        plan_date: row.get("plan_date")?,
        category: row.get("category")?,
    })
}
