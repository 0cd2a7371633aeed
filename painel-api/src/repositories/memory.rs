use std::{
    marker::PhantomData,
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use painel::Subtask;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::{
    models::{Record, RecordId, Stored},
    ports::outbound::{RecordRepository, SubtaskRepository},
};

use super::RepositoryError;

/// Process-local table backed by a `Vec` in insertion order.
#[derive(Clone)]
pub struct MemoryRepository<T> {
    rows: Arc<RwLock<Vec<Stored<T>>>>,
    next_id: Arc<AtomicI32>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI32::new(1)),
            _record: PhantomData,
        }
    }
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unique(rows: &[Stored<T>], code: &str, except: Option<RecordId>) -> Result<(), RepositoryError> {
        let taken = rows
            .iter()
            .any(|row| Some(row.id) != except && row.record.code() == code);
        if taken {
            return Err(RepositoryError::DuplicateCode(code.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> RecordRepository<T> for MemoryRepository<T> {
    async fn list(&self) -> Result<Vec<Stored<T>>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().rev().cloned().collect())
    }

    async fn get(&self, id: RecordId) -> Result<Stored<T>, RepositoryError> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(T::KIND, id))
    }

    async fn create(&self, record: &T) -> Result<Stored<T>, RepositoryError> {
        let mut rows = self.rows.write().await;
        Self::ensure_unique(&rows, record.code(), None)?;

        let now = OffsetDateTime::now_utc();
        let stored = Stored {
            id: RecordId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            created_at: now,
            updated_at: now,
            record: record.clone(),
        };
        rows.push(stored.clone());

        Ok(stored)
    }

    async fn update(&self, id: RecordId, record: &T) -> Result<Stored<T>, RepositoryError> {
        let mut rows = self.rows.write().await;
        Self::ensure_unique(&rows, record.code(), Some(id))?;

        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RepositoryError::not_found(T::KIND, id))?;
        row.record = record.clone();
        row.updated_at = OffsetDateTime::now_utc();

        Ok(row.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(RepositoryError::not_found(T::KIND, id));
        }
        Ok(())
    }
}

#[async_trait]
impl SubtaskRepository for MemoryRepository<Subtask> {
    async fn list_for_activity(
        &self,
        activity_id: RecordId,
    ) -> Result<Vec<Stored<Subtask>>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.record.activity_id == activity_id.as_i32())
            .cloned()
            .collect())
    }

    async fn delete_for_activity(&self, activity_id: RecordId) -> Result<u64, RepositoryError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.record.activity_id != activity_id.as_i32());
        Ok((before - rows.len()) as u64)
    }
}
