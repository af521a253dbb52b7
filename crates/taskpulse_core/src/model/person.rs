//! Person profile model and mail capability flags.
//!
//! # Responsibility
//! - Carry the per-person notification watermark and cooldown state read by
//!   digest eligibility.
//!
//! # Invariants
//! - `last_sent_note_id` only moves forward; the batch sender advances it
//!   after each dispatched batch. This core never mutates it.
//! - `last_mail_at == None` means the person was never mailed.

use serde::{Deserialize, Serialize};

use crate::model::note::{NoteId, PersonId};

/// Capability bit: person accepts rate-limited batched mail.
pub const FLAG_BATCHED_MAIL: i64 = 1 << 0;

/// Per-person notification state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub person_id: PersonId,
    /// Highest note id already covered by a dispatched batch.
    pub last_sent_note_id: NoteId,
    /// Instant of the last dispatched mail, epoch milliseconds.
    pub last_mail_at: Option<i64>,
    /// Capability bit set; see `FLAG_BATCHED_MAIL`.
    pub flags: i64,
}

impl PersonProfile {
    /// Returns whether batched mail delivery is enabled for this person.
    pub fn can_receive_batched_mail(&self) -> bool {
        self.flags & FLAG_BATCHED_MAIL != 0
    }
}
