use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates::serde_tolerant;

fn default_subtask_status() -> String {
    "Pendente".to_string()
}

/// A checklist item under an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub code: String,
    /// Row id of the parent activity.
    pub activity_id: i32,
    pub name: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default, with = "serde_tolerant::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "serde_tolerant::option")]
    pub end_date: Option<Date>,
    #[serde(default = "default_subtask_status")]
    pub status: String,
    #[serde(default)]
    pub progress_percent: i32,
    #[serde(default)]
    pub notes: String,
}

impl Subtask {
    pub fn new(code: impl Into<String>, activity_id: i32, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            activity_id,
            name: name.into(),
            assignee: String::new(),
            start_date: None,
            end_date: None,
            status: default_subtask_status(),
            progress_percent: 0,
            notes: String::new(),
        }
    }
}
