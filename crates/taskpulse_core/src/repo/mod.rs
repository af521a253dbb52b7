//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the digest,
//!   idempotency and list aggregation engines.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every bulk API issues a single statement scoped to the full id set;
//!   repositories never loop one query per task.
//! - Not-found reads return `Option`/empty collections, never errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::DbError;

pub mod digest_repo;
pub mod note_repo;
pub mod task_list_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Data-access error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Storage transport or bootstrap failure; propagated unchanged.
    Db(DbError),
    /// Persisted state violates a model invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Builds a `?, ?, ...` placeholder list for SQL `IN` clauses.
pub(crate) fn sql_placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count.saturating_mul(3));
    for index in 0..count {
        if index > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}
