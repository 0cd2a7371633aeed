use async_trait::async_trait;
use painel::{Assignees, Project};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

use crate::{
    domain::{
        models::{RecordId, Stored},
        ports::outbound::RecordRepository,
    },
    repositories::RepositoryError,
};

const COLUMNS: &str = "id, code, name, description, priority, assignees, planned_start, \
    planned_end, status, progress_percent, notes, approved, created_at, updated_at";

#[derive(FromRow)]
struct ProjectRow {
    id: i32,
    code: String,
    name: String,
    description: String,
    priority: String,
    assignees: String,
    planned_start: Option<Date>,
    planned_end: Option<Date>,
    status: String,
    progress_percent: i32,
    notes: String,
    approved: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProjectRow> for Stored<Project> {
    fn from(row: ProjectRow) -> Self {
        Stored {
            id: RecordId::new(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            record: Project {
                code: row.code,
                name: row.name,
                description: row.description,
                priority: row.priority,
                assignees: Assignees::parse(&row.assignees),
                planned_start: row.planned_start,
                planned_end: row.planned_end,
                status: row.status,
                progress_percent: row.progress_percent,
                notes: row.notes,
                approved: row.approved,
            },
        }
    }
}

pub struct ProjectRepositoryImpl {
    pool: PgPool,
}

impl ProjectRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Project> for ProjectRepositoryImpl {
    async fn list(&self) -> Result<Vec<Stored<Project>>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Stored::from).collect())
    }

    async fn get(&self, id: RecordId) -> Result<Stored<Project>, RepositoryError> {
        sqlx::query_as::<_, ProjectRow>(&format!("SELECT {COLUMNS} FROM projects WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?
            .map(Stored::from)
            .ok_or_else(|| RepositoryError::not_found("Project", id))
    }

    async fn create(&self, project: &Project) -> Result<Stored<Project>, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (code, name, description, priority, assignees, planned_start,
                planned_end, status, progress_percent, notes, approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&project.code)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.priority)
        .bind(project.assignees.joined())
        .bind(project.planned_start)
        .bind(project.planned_end)
        .bind(&project.status)
        .bind(project.progress_percent)
        .bind(&project.notes)
        .bind(project.approved)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, &project.code))?;

        Ok(row.into())
    }

    async fn update(&self, id: RecordId, project: &Project) -> Result<Stored<Project>, RepositoryError> {
        sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET code = $2, name = $3, description = $4, priority = $5, assignees = $6,
                planned_start = $7, planned_end = $8, status = $9, progress_percent = $10,
                notes = $11, approved = $12, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&project.code)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.priority)
        .bind(project.assignees.joined())
        .bind(project.planned_start)
        .bind(project.planned_end)
        .bind(&project.status)
        .bind(project.progress_percent)
        .bind(&project.notes)
        .bind(project.approved)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, &project.code))?
        .map(Stored::from)
        .ok_or_else(|| RepositoryError::not_found("Project", id))
    }

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Project", id));
        }
        Ok(())
    }
}
