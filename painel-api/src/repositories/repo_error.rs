use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Code already in use: {0}")]
    DuplicateCode(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A stored row that does not map back onto its record type.
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

impl RepositoryError {
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", kind, id))
    }

    /// Map a failed INSERT/UPDATE, turning unique violations into
    /// `DuplicateCode`.
    pub fn from_write(err: sqlx::Error, code: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::DuplicateCode(code.to_string())
            }
            _ => Self::DatabaseError(err),
        }
    }
}
