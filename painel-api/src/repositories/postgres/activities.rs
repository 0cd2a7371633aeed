use async_trait::async_trait;
use painel::{Activity, Assignees};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

use super::{from_db_bigint, from_db_int, to_db_bigint, to_db_int};
use crate::{
    domain::{
        models::{RecordId, Stored},
        ports::outbound::RecordRepository,
    },
    repositories::RepositoryError,
};

const COLUMNS: &str = "id, code, project_code, project_name, project_key, project_owner, task, \
    assignees, planned_start, planned_end, start_date, duration_days, progress_percent, \
    hours_used, due_date, status, schedule_state, planned_hours, hours_variance, notes, \
    created_at, updated_at";

#[derive(FromRow)]
struct ActivityRow {
    id: i32,
    code: String,
    project_code: String,
    project_name: String,
    project_key: Option<String>,
    project_owner: String,
    task: String,
    assignees: String,
    planned_start: Option<Date>,
    planned_end: Option<Date>,
    start_date: Option<Date>,
    duration_days: i32,
    progress_percent: i32,
    hours_used: i32,
    due_date: Option<Date>,
    status: String,
    schedule_state: String,
    planned_hours: i64,
    hours_variance: i64,
    notes: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<ActivityRow> for Stored<Activity> {
    type Error = RepositoryError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let record = Activity {
            code: row.code,
            project_code: row.project_code,
            project_name: row.project_name,
            project_key: row.project_key,
            project_owner: row.project_owner,
            task: row.task,
            assignees: Assignees::parse(&row.assignees),
            planned_start: row.planned_start,
            planned_end: row.planned_end,
            start_date: row.start_date,
            duration_days: from_db_int("duration_days", row.duration_days)?,
            progress_percent: row.progress_percent,
            hours_used: from_db_int("hours_used", row.hours_used)?,
            due_date: row.due_date,
            status: row.status.parse().map_err(RepositoryError::InvalidRecord)?,
            schedule_state: row
                .schedule_state
                .parse()
                .map_err(RepositoryError::InvalidRecord)?,
            planned_hours: from_db_bigint("planned_hours", row.planned_hours)?,
            hours_variance: row.hours_variance,
            notes: row.notes,
        };

        Ok(Stored {
            id: RecordId::new(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            record,
        })
    }
}

/// Column values of an activity, in the `$n` order the writes bind them.
struct ActivityParams<'a> {
    activity: &'a Activity,
    duration_days: i32,
    hours_used: i32,
    planned_hours: i64,
}

impl<'a> ActivityParams<'a> {
    fn new(activity: &'a Activity) -> Result<Self, RepositoryError> {
        Ok(Self {
            activity,
            duration_days: to_db_int("duration_days", activity.duration_days)?,
            hours_used: to_db_int("hours_used", activity.hours_used)?,
            planned_hours: to_db_bigint("planned_hours", activity.planned_hours)?,
        })
    }

    fn bind<'q, O>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>
    where
        'a: 'q,
    {
        let a = self.activity;
        query
            .bind(&a.code)
            .bind(&a.project_code)
            .bind(&a.project_name)
            .bind(&a.project_key)
            .bind(&a.project_owner)
            .bind(&a.task)
            .bind(a.assignees.joined())
            .bind(a.planned_start)
            .bind(a.planned_end)
            .bind(a.start_date)
            .bind(self.duration_days)
            .bind(a.progress_percent)
            .bind(self.hours_used)
            .bind(a.due_date)
            .bind(a.status.as_str())
            .bind(a.schedule_state.as_str())
            .bind(self.planned_hours)
            .bind(a.hours_variance)
            .bind(&a.notes)
    }
}

pub struct ActivityRepositoryImpl {
    pool: PgPool,
}

impl ActivityRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Activity> for ActivityRepositoryImpl {
    async fn list(&self) -> Result<Vec<Stored<Activity>>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActivityRow>(&format!(
            "SELECT {COLUMNS} FROM activities ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Stored::try_from).collect()
    }

    async fn get(&self, id: RecordId) -> Result<Stored<Activity>, RepositoryError> {
        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            "SELECT {COLUMNS} FROM activities WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Activity", id))?;

        row.try_into()
    }

    async fn create(&self, activity: &Activity) -> Result<Stored<Activity>, RepositoryError> {
        let params = ActivityParams::new(activity)?;
        let sql = format!(
            r#"
            INSERT INTO activities (code, project_code, project_name, project_key, project_owner,
                task, assignees, planned_start, planned_end, start_date, duration_days,
                progress_percent, hours_used, due_date, status, schedule_state, planned_hours,
                hours_variance, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19)
            RETURNING {COLUMNS}
            "#
        );

        let row = params
            .bind(sqlx::query_as::<_, ActivityRow>(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, &activity.code))?;

        row.try_into()
    }

    async fn update(&self, id: RecordId, activity: &Activity) -> Result<Stored<Activity>, RepositoryError> {
        let params = ActivityParams::new(activity)?;
        let sql = format!(
            r#"
            UPDATE activities
            SET code = $1, project_code = $2, project_name = $3, project_key = $4,
                project_owner = $5, task = $6, assignees = $7, planned_start = $8,
                planned_end = $9, start_date = $10, duration_days = $11, progress_percent = $12,
                hours_used = $13, due_date = $14, status = $15, schedule_state = $16,
                planned_hours = $17, hours_variance = $18, notes = $19, updated_at = now()
            WHERE id = $20
            RETURNING {COLUMNS}
            "#
        );

        let row = params
            .bind(sqlx::query_as::<_, ActivityRow>(&sql))
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, &activity.code))?
            .ok_or_else(|| RepositoryError::not_found("Activity", id))?;

        row.try_into()
    }

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Activity", id));
        }
        Ok(())
    }
}
