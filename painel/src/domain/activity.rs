use serde::{Deserialize, Serialize};
use time::Date;

use super::{ActivityStatus, Assignees, ScheduleState};
use crate::dates::serde_tolerant;

/// Duration given to freshly created activities.
pub const DEFAULT_DURATION_DAYS: u32 = 5;

/// Working hours planned per day of duration.
pub const HOURS_PER_DAY: u64 = 7;

fn default_duration_days() -> u32 {
    DEFAULT_DURATION_DAYS
}

/// A task belonging to a project.
///
/// `due_date`, `status`, `schedule_state`, `planned_hours` and
/// `hours_variance` are derived; they are kept consistent by
/// [`crate::recompute`] and [`crate::refresh_derived`] and are never edited
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub code: String,
    /// Denormalized project reference, e.g. `"PRJ009 - API Gateway Corporativo"`.
    #[serde(default)]
    pub project_code: String,
    #[serde(default)]
    pub project_name: String,
    /// Normalized code of the owning project, resolved when the activity is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    #[serde(default)]
    pub project_owner: String,
    #[serde(default)]
    pub task: String,
    #[serde(default, alias = "responsaveisTarefa")]
    pub assignees: Assignees,
    #[serde(default, with = "serde_tolerant::option")]
    pub planned_start: Option<Date>,
    #[serde(default, with = "serde_tolerant::option")]
    pub planned_end: Option<Date>,
    #[serde(default, with = "serde_tolerant::option")]
    pub start_date: Option<Date>,
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    /// `-1` means cancelled, `0..=100` is the completion percentage.
    #[serde(default)]
    pub progress_percent: i32,
    #[serde(default)]
    pub hours_used: u32,
    #[serde(default, with = "serde_tolerant::option")]
    pub due_date: Option<Date>,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub schedule_state: ScheduleState,
    #[serde(default)]
    pub planned_hours: u64,
    #[serde(default)]
    pub hours_variance: i64,
    #[serde(default)]
    pub notes: String,
}

impl Activity {
    /// A new activity with the default duration and no start date, its
    /// derived fields already consistent.
    pub fn new(code: impl Into<String>, task: impl Into<String>) -> Self {
        let planned_hours = u64::from(DEFAULT_DURATION_DAYS) * HOURS_PER_DAY;
        Self {
            code: code.into(),
            project_code: String::new(),
            project_name: String::new(),
            project_key: None,
            project_owner: String::new(),
            task: task.into(),
            assignees: Assignees::default(),
            planned_start: None,
            planned_end: None,
            start_date: None,
            duration_days: DEFAULT_DURATION_DAYS,
            progress_percent: 0,
            hours_used: 0,
            due_date: None,
            status: ActivityStatus::NotStarted,
            schedule_state: ScheduleState::OnTime,
            planned_hours,
            hours_variance: -(planned_hours as i64),
            notes: String::new(),
        }
    }

    pub fn with_project(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.project_code = code.into();
        self.project_name = name.into();
        self
    }

    pub fn with_project_key(mut self, key: impl Into<String>) -> Self {
        self.project_key = Some(key.into());
        self
    }

    pub fn with_project_owner(mut self, owner: impl Into<String>) -> Self {
        self.project_owner = owner.into();
        self
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

    // The setters below touch manual inputs only; follow them with
    // `refreshed` to bring the derived fields back in line.

    pub fn with_start_date(mut self, start_date: Date) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    pub fn with_progress(mut self, progress_percent: i32) -> Self {
        self.progress_percent = progress_percent;
        self
    }

    pub fn with_hours_used(mut self, hours: u32) -> Self {
        self.hours_used = hours;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Recompute every derived field against `today`.
    pub fn refreshed(self, today: Date) -> Self {
        crate::refresh_derived(self, today)
    }

    /// The legacy project reference: the project code text, or the project
    /// name when no code was recorded.
    pub fn project_reference(&self) -> &str {
        if self.project_code.is_empty() {
            &self.project_name
        } else {
            &self.project_code
        }
    }

    /// Identity used when counting distinct projects.
    pub fn project_label(&self) -> &str {
        match &self.project_key {
            Some(key) => key,
            None if !self.project_name.is_empty() => &self.project_name,
            None => &self.project_code,
        }
    }
}
