//! Record repository ports (outbound).
//!
//! One table per record kind, each unique by `code`. Implemented by the
//! Postgres adapters and by the in-memory tables used in tests.

use async_trait::async_trait;
use painel::Subtask;

use crate::{
    domain::models::{Record, RecordId, Stored},
    repositories::RepositoryError,
};

#[async_trait]
pub trait RecordRepository<T: Record>: Send + Sync + 'static {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<Stored<T>>, RepositoryError>;

    async fn get(&self, id: RecordId) -> Result<Stored<T>, RepositoryError>;

    /// Fails with `DuplicateCode` when another record already uses the code.
    async fn create(&self, record: &T) -> Result<Stored<T>, RepositoryError>;

    /// Replace the record, keeping its id and creation time.
    async fn update(&self, id: RecordId, record: &T) -> Result<Stored<T>, RepositoryError>;

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait SubtaskRepository: RecordRepository<Subtask> {
    /// Subtasks of one activity, newest first.
    async fn list_for_activity(
        &self,
        activity_id: RecordId,
    ) -> Result<Vec<Stored<Subtask>>, RepositoryError>;

    /// Remove every subtask of one activity, returning how many were removed.
    async fn delete_for_activity(&self, activity_id: RecordId) -> Result<u64, RepositoryError>;
}
