use painel::{Activity, Person, Project, Subtask};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::RecordId;

/// A record together with its row metadata.
///
/// Serializes flat: `{ "id": .., "createdAt": .., "updatedAt": .., ...record }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<T> {
    pub id: RecordId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn into_record(self) -> T {
        self.record
    }
}

/// A record kind kept in its own table, unique by `code`.
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    fn code(&self) -> &str;
}

impl Record for Project {
    const KIND: &'static str = "Project";

    fn code(&self) -> &str {
        &self.code
    }
}

impl Record for Person {
    const KIND: &'static str = "Person";

    fn code(&self) -> &str {
        &self.code
    }
}

impl Record for Activity {
    const KIND: &'static str = "Activity";

    fn code(&self) -> &str {
        &self.code
    }
}

impl Record for Subtask {
    const KIND: &'static str = "Subtask";

    fn code(&self) -> &str {
        &self.code
    }
}
