//! Digest eligibility composition.
//!
//! # Responsibility
//! - Model the announcement and participant selections as named strategies
//!   over one shared rule contract.
//! - Merge rule outputs into a single batch plan without double-targeting
//!   any (person, note) pair.
//!
//! # Invariants
//! - Rules are pure reads; this service never advances watermarks. The
//!   caller must commit `last_sent_note_id` atomically with "batch sent".
//! - Cross-rule duplicates keep the first rule's pair.

use std::collections::HashSet;

use log::info;

use crate::model::note::NoteId;
use crate::repo::digest_repo::{DigestPair, DigestRepository};
use crate::repo::RepoResult;

/// One selection strategy feeding the digest batch plan.
pub trait EligibilityRule<R: DigestRepository> {
    /// Stable rule name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Selects due (person, note) pairs above the watermark.
    fn select(&self, repo: &R, since_note_id: NoteId, now_ms: i64) -> RepoResult<Vec<DigestPair>>;
}

/// Announcement-follower strategy: targets followers still at the never-read
/// sentinel.
pub struct AnnouncementRule;

impl<R: DigestRepository> EligibilityRule<R> for AnnouncementRule {
    fn name(&self) -> &'static str {
        "announcement"
    }

    fn select(&self, repo: &R, since_note_id: NoteId, now_ms: i64) -> RepoResult<Vec<DigestPair>> {
        repo.eligible_announcement_pairs(since_note_id, now_ms)
    }
}

/// Participant strategy: targets persons holding the task in their Inbox.
pub struct ParticipantRule;

impl<R: DigestRepository> EligibilityRule<R> for ParticipantRule {
    fn name(&self) -> &'static str {
        "participant"
    }

    fn select(&self, repo: &R, since_note_id: NoteId, now_ms: i64) -> RepoResult<Vec<DigestPair>> {
        repo.eligible_participant_pairs(since_note_id, now_ms)
    }
}

/// Digest eligibility facade composing the standard rules.
pub struct DigestService<R: DigestRepository> {
    repo: R,
}

impl<R: DigestRepository> DigestService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Collects all pairs due for the next batch using the announcement and
    /// participant rules, in that order.
    pub fn collect_due(&self, since_note_id: NoteId, now_ms: i64) -> RepoResult<Vec<DigestPair>> {
        self.collect_with(
            &[&AnnouncementRule, &ParticipantRule],
            since_note_id,
            now_ms,
        )
    }

    /// Collects due pairs using caller-supplied rules. Pairs selected by
    /// more than one rule are kept once, from the earliest rule.
    pub fn collect_with(
        &self,
        rules: &[&dyn EligibilityRule<R>],
        since_note_id: NoteId,
        now_ms: i64,
    ) -> RepoResult<Vec<DigestPair>> {
        let mut seen: HashSet<(i64, i64)> = HashSet::new();
        let mut plan = Vec::new();

        for rule in rules {
            let selected = rule.select(&self.repo, since_note_id, now_ms)?;
            info!(
                "event=digest_select module=digest status=ok rule={} since_note_id={since_note_id} pairs={}",
                rule.name(),
                selected.len()
            );
            for pair in selected {
                if seen.insert((pair.person_id, pair.note_id)) {
                    plan.push(pair);
                }
            }
        }

        Ok(plan)
    }
}
