//! Digest eligibility repository.
//!
//! # Responsibility
//! - Select (person, note) pairs due for the next batched notification.
//! - Keep the announcement and participant selections as two separate
//!   queries; their read-marker semantics differ and must not be merged.
//!
//! # Invariants
//! - No returned pair has `note_id <= since_note_id`.
//! - No returned pair targets a person mailed within the cooldown window or
//!   whose `last_sent_note_id` already covers the note.
//! - Pairs are deduplicated on (person, note) within each selection.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::model::note::{NoteId, PersonId};
use crate::model::person::{PersonProfile, FLAG_BATCHED_MAIL};
use crate::repo::RepoResult;

/// Minimum gap between two batched mails to the same person.
pub const MAIL_COOLDOWN_MS: i64 = 15 * 60 * 1000;

/// One "notify this person about this note" decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigestPair {
    pub person_id: PersonId,
    pub note_id: NoteId,
    /// Whether the pair came from the announcement-follower selection.
    pub is_announcement: bool,
}

/// Repository contract for digest eligibility selections.
///
/// Both selections are pure reads; re-running them after a failed send is
/// safe because only the caller advances `last_sent_note_id`.
pub trait DigestRepository {
    /// Announcement-follower selection: followers still at the never-read
    /// sentinel for a task with notes above the watermark.
    fn eligible_announcement_pairs(
        &self,
        since_note_id: NoteId,
        now_ms: i64,
    ) -> RepoResult<Vec<DigestPair>>;

    /// Participant selection: persons holding the task in their Inbox with
    /// unread notes above the watermark.
    fn eligible_participant_pairs(
        &self,
        since_note_id: NoteId,
        now_ms: i64,
    ) -> RepoResult<Vec<DigestPair>>;

    /// Reads one person's notification state; used by the batch sender to
    /// verify the watermark before advancing it.
    fn profile(&self, person_id: PersonId) -> RepoResult<Option<PersonProfile>>;
}

/// SQLite-backed digest eligibility repository.
pub struct SqliteDigestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDigestRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DigestRepository for SqliteDigestRepository<'_> {
    fn eligible_announcement_pairs(
        &self,
        since_note_id: NoteId,
        now_ms: i64,
    ) -> RepoResult<Vec<DigestPair>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT pp.person_id, n.id
             FROM user_announcements ua
             INNER JOIN person_profiles pp ON pp.person_id = ua.person_id
             INNER JOIN notes n ON n.task_id = ua.task_id
             WHERE n.id > ?1
               AND ua.last_read_note_id = 0
               AND (pp.last_mail_at IS NULL OR pp.last_mail_at < ?2)
               AND pp.last_sent_note_id < n.id
               AND (pp.flags & ?3) != 0
             ORDER BY pp.person_id ASC, n.id ASC;",
        )?;
        let cooldown_cutoff = now_ms - MAIL_COOLDOWN_MS;
        let mut rows = stmt.query(params![since_note_id, cooldown_cutoff, FLAG_BATCHED_MAIL])?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            pairs.push(parse_pair_row(row, true)?);
        }
        Ok(pairs)
    }

    fn eligible_participant_pairs(
        &self,
        since_note_id: NoteId,
        now_ms: i64,
    ) -> RepoResult<Vec<DigestPair>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT pp.person_id, n.id
             FROM notes n
             INNER JOIN user_tasks ut ON ut.task_id = n.task_id
             INNER JOIN person_profiles pp ON pp.person_id = ut.person_id
             WHERE n.id > ?1
               AND ut.folder = 'inbox'
               AND ut.last_read_note_id < n.id
               AND pp.last_sent_note_id < n.id
               AND (pp.last_mail_at IS NULL OR pp.last_mail_at < ?2)
               AND (pp.flags & ?3) != 0
             ORDER BY pp.person_id ASC, n.id ASC;",
        )?;
        let cooldown_cutoff = now_ms - MAIL_COOLDOWN_MS;
        let mut rows = stmt.query(params![since_note_id, cooldown_cutoff, FLAG_BATCHED_MAIL])?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            pairs.push(parse_pair_row(row, false)?);
        }
        Ok(pairs)
    }

    fn profile(&self, person_id: PersonId) -> RepoResult<Option<PersonProfile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT person_id, last_sent_note_id, last_mail_at, flags
                 FROM person_profiles
                 WHERE person_id = ?1;",
                params![person_id],
                |row| {
                    Ok(PersonProfile {
                        person_id: row.get(0)?,
                        last_sent_note_id: row.get(1)?,
                        last_mail_at: row.get(2)?,
                        flags: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }
}

fn parse_pair_row(row: &Row<'_>, is_announcement: bool) -> RepoResult<DigestPair> {
    Ok(DigestPair {
        person_id: row.get(0)?,
        note_id: row.get(1)?,
        is_announcement,
    })
}
