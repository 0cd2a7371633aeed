use async_trait::async_trait;
use painel::Person;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::{
    domain::{
        models::{RecordId, Stored},
        ports::outbound::RecordRepository,
    },
    repositories::RepositoryError,
};

const COLUMNS: &str = "id, code, name, email, phone, role, department, status, active, notes, \
    created_at, updated_at";

#[derive(FromRow)]
struct PersonRow {
    id: i32,
    code: String,
    name: String,
    email: String,
    phone: String,
    role: String,
    department: String,
    status: String,
    active: bool,
    notes: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PersonRow> for Stored<Person> {
    fn from(row: PersonRow) -> Self {
        Stored {
            id: RecordId::new(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            record: Person {
                code: row.code,
                name: row.name,
                email: row.email,
                phone: row.phone,
                role: row.role,
                department: row.department,
                status: row.status,
                active: row.active,
                notes: row.notes,
            },
        }
    }
}

pub struct PersonRepositoryImpl {
    pool: PgPool,
}

impl PersonRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<Person> for PersonRepositoryImpl {
    async fn list(&self) -> Result<Vec<Stored<Person>>, RepositoryError> {
        let rows = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {COLUMNS} FROM people ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Stored::from).collect())
    }

    async fn get(&self, id: RecordId) -> Result<Stored<Person>, RepositoryError> {
        sqlx::query_as::<_, PersonRow>(&format!("SELECT {COLUMNS} FROM people WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?
            .map(Stored::from)
            .ok_or_else(|| RepositoryError::not_found("Person", id))
    }

    async fn create(&self, person: &Person) -> Result<Stored<Person>, RepositoryError> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            r#"
            INSERT INTO people (code, name, email, phone, role, department, status, active, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&person.code)
        .bind(&person.name)
        .bind(&person.email)
        .bind(&person.phone)
        .bind(&person.role)
        .bind(&person.department)
        .bind(&person.status)
        .bind(person.active)
        .bind(&person.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, &person.code))?;

        Ok(row.into())
    }

    async fn update(&self, id: RecordId, person: &Person) -> Result<Stored<Person>, RepositoryError> {
        sqlx::query_as::<_, PersonRow>(&format!(
            r#"
            UPDATE people
            SET code = $2, name = $3, email = $4, phone = $5, role = $6, department = $7,
                status = $8, active = $9, notes = $10, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&person.code)
        .bind(&person.name)
        .bind(&person.email)
        .bind(&person.phone)
        .bind(&person.role)
        .bind(&person.department)
        .bind(&person.status)
        .bind(person.active)
        .bind(&person.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, &person.code))?
        .map(Stored::from)
        .ok_or_else(|| RepositoryError::not_found("Person", id))
    }

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Person", id));
        }
        Ok(())
    }
}
