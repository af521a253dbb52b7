//! Read-side core for a collaborative task/messaging platform: digest
//! eligibility, duplicate-submission detection, new-activity summaries and
//! bulk task list materialization.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attachment::Attachment;
pub use model::draft::Draft;
pub use model::note::{NewNote, Note, NoteId, PersonId, TaskId};
pub use model::person::{PersonProfile, FLAG_BATCHED_MAIL};
pub use model::subscription::{Folder, UserAnnouncement, UserTask};
pub use model::task::TaskHeader;
pub use model::task_list::{
    DetailLevel, ListMode, Loaded, NoteView, PersonalHeader, TaskListEntry,
};
pub use repo::digest_repo::{
    DigestPair, DigestRepository, SqliteDigestRepository, MAIL_COOLDOWN_MS,
};
pub use repo::note_repo::{NewCommentSummary, NoteRepository, SqliteNoteRepository};
pub use repo::task_list_repo::{SqliteTaskListRepository, TaskListRepository};
pub use repo::{RepoError, RepoResult};
pub use service::activity_service::ActivityService;
pub use service::digest_service::{
    AnnouncementRule, DigestService, EligibilityRule, ParticipantRule,
};
pub use service::idempotency::{DuplicateCheck, IdempotencyGuard};
pub use service::task_list_service::{AggregateError, ListRequest, TaskListAggregator};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
