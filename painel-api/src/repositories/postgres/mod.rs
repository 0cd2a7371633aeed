//! Postgres adapters for the record repositories.
//!
//! Queries are checked at runtime (`query_as` with `FromRow` rows) so the
//! crate builds without a database. Counts the engine keeps unsigned are
//! stored as INTEGER/BIGINT and converted on the way in and out.

mod activities;
mod people;
mod projects;
mod subtasks;

pub use activities::*;
pub use people::*;
pub use projects::*;
pub use subtasks::*;

use super::RepositoryError;

fn to_db_int(field: &str, value: u32) -> Result<i32, RepositoryError> {
    i32::try_from(value)
        .map_err(|_| RepositoryError::InvalidRecord(format!("{} too large: {}", field, value)))
}

fn from_db_int(field: &str, value: i32) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::InvalidRecord(format!("negative {}: {}", field, value)))
}

fn to_db_bigint(field: &str, value: u64) -> Result<i64, RepositoryError> {
    i64::try_from(value)
        .map_err(|_| RepositoryError::InvalidRecord(format!("{} too large: {}", field, value)))
}

fn from_db_bigint(field: &str, value: i64) -> Result<u64, RepositoryError> {
    u64::try_from(value)
        .map_err(|_| RepositoryError::InvalidRecord(format!("negative {}: {}", field, value)))
}
