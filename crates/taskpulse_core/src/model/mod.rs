//! Domain model for the task/notification read-side core.
//!
//! # Responsibility
//! - Define canonical records shared by digest, idempotency and list
//!   aggregation use-cases.
//! - Keep one storage-agnostic shape per entity; repositories own SQL.
//!
//! # Invariants
//! - Note ids are strictly increasing and never reused.
//! - Per-person watermarks (`last_sent_note_id`) only move forward.
//! - An attachment bound to a note belongs to that note's task.

pub mod attachment;
pub mod draft;
pub mod note;
pub mod person;
pub mod subscription;
pub mod task;
pub mod task_list;
