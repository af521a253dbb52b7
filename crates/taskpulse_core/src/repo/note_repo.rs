//! Note stream repository: append, watermark scans, duplicate detection and
//! new-activity summaries.
//!
//! # Responsibility
//! - Own all SQL touching `notes` and `note_client_ids`.
//! - Record client correlation ids atomically with note insertion so the
//!   idempotency guard can observe them.
//!
//! # Invariants
//! - Note ids are assigned by storage and strictly increase; inserts never
//!   supply an explicit id.
//! - `create_note` writes the note and its correlation id in one
//!   transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::model::note::{NewNote, Note, NoteId, PersonId, TaskId};
use crate::repo::{sql_placeholders, RepoResult};

pub(crate) const NOTE_SELECT_SQL: &str = "SELECT
    id,
    task_id,
    author_id,
    created_at,
    constant_text,
    private_text,
    filterable_text,
    version
FROM notes";

/// New-activity summary for one task.
///
/// `last_at` is `None` only in the degenerate zero-count case; a summary with
/// a positive count always carries the most recent note instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCommentSummary {
    /// Notes created after the requested watermark.
    pub count: i64,
    /// Creation instant of the most recent qualifying note, epoch ms.
    pub last_at: Option<i64>,
}

/// Repository contract for the note stream.
pub trait NoteRepository {
    /// Appends one note, optionally recording the client correlation id of
    /// the submission. Returns the storage-assigned note id.
    fn create_note(&mut self, note: &NewNote, client_id: Option<Uuid>) -> RepoResult<NoteId>;

    /// Looks up one note by id.
    fn note(&self, note_id: NoteId) -> RepoResult<Option<Note>>;

    /// Returns all notes with id above the watermark, in id order.
    fn notes_after(&self, watermark: NoteId) -> RepoResult<Vec<Note>>;

    /// Returns notes of the given tasks ordered by task id, then note id.
    fn task_history(&self, task_ids: &[TaskId]) -> RepoResult<Vec<Note>>;

    /// Looks up a prior submission by the same person with the same client
    /// correlation id.
    fn find_by_client_id(
        &self,
        person_id: PersonId,
        client_id: Uuid,
    ) -> RepoResult<Option<(TaskId, NoteId)>>;

    /// Returns every (task, note) already recorded for the given client
    /// correlation ids, regardless of submitter.
    fn bulk_find_by_client_ids(&self, client_ids: &[Uuid]) -> RepoResult<Vec<(TaskId, NoteId)>>;

    /// Summarizes notes created after `watermark` on one task; see
    /// `NewCommentSummary`. `None` means no qualifying activity row.
    fn new_comment_summary(
        &self,
        task_id: TaskId,
        watermark: NoteId,
        viewer_id: Option<PersonId>,
    ) -> RepoResult<Option<NewCommentSummary>>;

    /// Returns the number of notes on one task.
    fn note_count(&self, task_id: TaskId) -> RepoResult<i64>;

    /// Returns the highest note id created before the given instant, or 0
    /// when no note qualifies. Used to re-seed the digest watermark.
    fn last_note_id_before(&self, instant_ms: i64) -> RepoResult<NoteId>;
}

/// SQLite-backed note stream repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&mut self, note: &NewNote, client_id: Option<Uuid>) -> RepoResult<NoteId> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO notes (
                task_id,
                author_id,
                created_at,
                constant_text,
                private_text,
                filterable_text,
                version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                note.task_id,
                note.author_id,
                note.created_at,
                note.constant_text.as_str(),
                note.private_text.as_str(),
                note.filterable_text.as_str(),
                note.version,
            ],
        )?;
        let note_id = tx.last_insert_rowid();

        if let Some(client_id) = client_id {
            tx.execute(
                "INSERT INTO note_client_ids (note_id, person_id, client_id)
                 VALUES (?1, ?2, ?3);",
                params![note_id, note.author_id, client_id.to_string()],
            )?;
        }

        tx.commit()?;
        Ok(note_id)
    }

    fn note(&self, note_id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![note_id])?;

        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn notes_after(&self, watermark: NoteId) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id > ?1 ORDER BY id ASC;"))?;
        let mut rows = stmt.query(params![watermark])?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn task_history(&self, task_ids: &[TaskId]) -> RepoResult<Vec<Note>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{NOTE_SELECT_SQL}
             WHERE task_id IN ({})
             ORDER BY task_id ASC, id ASC;",
            sql_placeholders(task_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(task_ids.iter()))?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn find_by_client_id(
        &self,
        person_id: PersonId,
        client_id: Uuid,
    ) -> RepoResult<Option<(TaskId, NoteId)>> {
        let found = self
            .conn
            .query_row(
                "SELECT n.task_id, n.id
                 FROM note_client_ids nc
                 INNER JOIN notes n ON n.id = nc.note_id
                 WHERE nc.person_id = ?1 AND nc.client_id = ?2;",
                params![person_id, client_id.to_string()],
                |row| Ok((row.get::<_, TaskId>(0)?, row.get::<_, NoteId>(1)?)),
            )
            .optional()?;
        Ok(found)
    }

    fn bulk_find_by_client_ids(&self, client_ids: &[Uuid]) -> RepoResult<Vec<(TaskId, NoteId)>> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT n.task_id, n.id
             FROM note_client_ids nc
             INNER JOIN notes n ON n.id = nc.note_id
             WHERE nc.client_id IN ({})
             ORDER BY n.id ASC;",
            sql_placeholders(client_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ids: Vec<String> = client_ids.iter().map(Uuid::to_string).collect();
        let mut rows = stmt.query(rusqlite::params_from_iter(ids.iter()))?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            pairs.push((row.get::<_, TaskId>(0)?, row.get::<_, NoteId>(1)?));
        }
        Ok(pairs)
    }

    fn new_comment_summary(
        &self,
        task_id: TaskId,
        watermark: NoteId,
        viewer_id: Option<PersonId>,
    ) -> RepoResult<Option<NewCommentSummary>> {
        // The viewer filter mirrors the acknowledgement join: a note is
        // excluded only when someone else's `last_comment_note_id` already
        // points at it.
        let row = match viewer_id {
            Some(viewer) => self
                .conn
                .query_row(
                    "SELECT COUNT(n.id), MAX(n.created_at)
                     FROM notes n
                     LEFT JOIN user_tasks ut
                        ON ut.task_id = n.task_id AND ut.last_comment_note_id = n.id
                     WHERE n.task_id = ?1
                       AND n.id > ?2
                       AND (ut.person_id IS NULL OR ut.person_id = ?3)
                     GROUP BY COALESCE(ut.person_id, -1)
                     LIMIT 1;",
                    params![task_id, watermark, viewer],
                    parse_summary_row,
                )
                .optional()?,
            None => self
                .conn
                .query_row(
                    "SELECT COUNT(n.id), MAX(n.created_at)
                     FROM notes n
                     WHERE n.task_id = ?1 AND n.id > ?2
                     GROUP BY n.task_id
                     LIMIT 1;",
                    params![task_id, watermark],
                    parse_summary_row,
                )
                .optional()?,
        };

        Ok(row.map(|(count, last_at)| NewCommentSummary {
            count,
            // A zero-count row keeps the count but reports no instant.
            last_at: if count > 0 { last_at } else { None },
        }))
    }

    fn note_count(&self, task_id: TaskId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(id) FROM notes WHERE task_id = ?1;",
            params![task_id],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count)
    }

    fn last_note_id_before(&self, instant_ms: i64) -> RepoResult<NoteId> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM notes
                 WHERE created_at < ?1
                 ORDER BY id DESC
                 LIMIT 1;",
                params![instant_ms],
                |row| row.get::<_, NoteId>(0),
            )
            .optional()?;
        Ok(id.unwrap_or(0))
    }
}

fn parse_summary_row(row: &Row<'_>) -> rusqlite::Result<(i64, Option<i64>)> {
    Ok((row.get(0)?, row.get(1)?))
}

pub(crate) fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        author_id: row.get("author_id")?,
        created_at: row.get("created_at")?,
        constant_text: row.get("constant_text")?,
        private_text: row.get("private_text")?,
        filterable_text: row.get("filterable_text")?,
        version: row.get("version")?,
    })
}
