use serde::{Deserialize, Serialize};
use time::Date;

use super::Assignees;
use crate::dates::serde_tolerant;

fn default_project_status() -> String {
    "Ativo".to_string()
}

/// A project that activities are grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub assignees: Assignees,
    #[serde(default, with = "serde_tolerant::option")]
    pub planned_start: Option<Date>,
    #[serde(default, with = "serde_tolerant::option")]
    pub planned_end: Option<Date>,
    #[serde(default = "default_project_status")]
    pub status: String,
    #[serde(default)]
    pub progress_percent: i32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub approved: bool,
}

impl Project {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            priority: String::new(),
            assignees: Assignees::default(),
            planned_start: None,
            planned_end: None,
            status: default_project_status(),
            progress_percent: 0,
            notes: String::new(),
            approved: false,
        }
    }

    pub fn with_assignees(mut self, assignees: impl Into<Assignees>) -> Self {
        self.assignees = assignees.into();
        self
    }

    pub fn with_planned_window(mut self, start: Option<Date>, end: Option<Date>) -> Self {
        self.planned_start = start;
        self.planned_end = end;
        self
    }

    /// The key activities use to reference this project.
    pub fn key(&self) -> String {
        normalize_project_key(&self.code)
    }
}

/// Canonical form of a project code: trimmed and upper-cased.
pub fn normalize_project_key(code: &str) -> String {
    code.trim().to_uppercase()
}
