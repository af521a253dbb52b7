//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details; every service is generic
//!   over its repository contract.

pub mod activity_service;
pub mod digest_service;
pub mod idempotency;
pub mod task_list_service;
