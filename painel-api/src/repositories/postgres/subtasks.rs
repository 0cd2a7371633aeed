use async_trait::async_trait;
use painel::Subtask;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

use crate::{
    domain::{
        models::{RecordId, Stored},
        ports::outbound::{RecordRepository, SubtaskRepository},
    },
    repositories::RepositoryError,
};

const COLUMNS: &str = "id, code, activity_id, name, assignee, start_date, end_date, status, \
    progress_percent, notes, created_at, updated_at";

#[derive(FromRow)]
struct SubtaskRow {
    id: i32,
    code: String,
    activity_id: i32,
    name: String,
    assignee: String,
    start_date: Option<Date>,
    end_date: Option<Date>,
    status: String,
    progress_percent: i32,
    notes: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<SubtaskRow> for Stored<Subtask> {
    fn from(row: SubtaskRow) -> Self {
        Stored {
            id: RecordId::new(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            record: Subtask {
                code: row.code,
                activity_id: row.activity_id,
                name: row.name,
                assignee: row.assignee,
                start_date: row.start_date,
                end_date: row.end_date,
                status: row.status,
                progress_percent: row.progress_percent,
                notes: row.notes,
            },
        }
    }
}

pub struct SubtaskRepositoryImpl {
    pool: PgPool,
}

impl SubtaskRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Subtask> for SubtaskRepositoryImpl {
    async fn list(&self) -> Result<Vec<Stored<Subtask>>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubtaskRow>(&format!(
            "SELECT {COLUMNS} FROM subtasks ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Stored::from).collect())
    }

    async fn get(&self, id: RecordId) -> Result<Stored<Subtask>, RepositoryError> {
        sqlx::query_as::<_, SubtaskRow>(&format!("SELECT {COLUMNS} FROM subtasks WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?
            .map(Stored::from)
            .ok_or_else(|| RepositoryError::not_found("Subtask", id))
    }

    async fn create(&self, subtask: &Subtask) -> Result<Stored<Subtask>, RepositoryError> {
        let row = sqlx::query_as::<_, SubtaskRow>(&format!(
            r#"
            INSERT INTO subtasks (code, activity_id, name, assignee, start_date, end_date, status,
                progress_percent, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&subtask.code)
        .bind(subtask.activity_id)
        .bind(&subtask.name)
        .bind(&subtask.assignee)
        .bind(subtask.start_date)
        .bind(subtask.end_date)
        .bind(&subtask.status)
        .bind(subtask.progress_percent)
        .bind(&subtask.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, &subtask.code))?;

        Ok(row.into())
    }

    async fn update(&self, id: RecordId, subtask: &Subtask) -> Result<Stored<Subtask>, RepositoryError> {
        sqlx::query_as::<_, SubtaskRow>(&format!(
            r#"
            UPDATE subtasks
            SET code = $2, activity_id = $3, name = $4, assignee = $5, start_date = $6,
                end_date = $7, status = $8, progress_percent = $9, notes = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&subtask.code)
        .bind(subtask.activity_id)
        .bind(&subtask.name)
        .bind(&subtask.assignee)
        .bind(subtask.start_date)
        .bind(subtask.end_date)
        .bind(&subtask.status)
        .bind(subtask.progress_percent)
        .bind(&subtask.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, &subtask.code))?
        .map(Stored::from)
        .ok_or_else(|| RepositoryError::not_found("Subtask", id))
    }

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Subtask", id));
        }
        Ok(())
    }
}

#[async_trait]
impl SubtaskRepository for SubtaskRepositoryImpl {
    async fn list_for_activity(
        &self,
        activity_id: RecordId,
    ) -> Result<Vec<Stored<Subtask>>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubtaskRow>(&format!(
            "SELECT {COLUMNS} FROM subtasks WHERE activity_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(activity_id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Stored::from).collect())
    }

    async fn delete_for_activity(&self, activity_id: RecordId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM subtasks WHERE activity_id = $1")
            .bind(activity_id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
