//! Derived-field recalculation for [`Activity`] records.
//!
//! Every edit goes through [`recompute_at`]: the changed field is set and
//! only the derived fields it feeds are recomputed, `due_date` before
//! `schedule_state` and `planned_hours` before `hours_variance`.

use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Date;

use crate::{
    dates::{self, serde_tolerant},
    Activity, ActivityStatus, Assignees, Error, Result, ScheduleState, HOURS_PER_DAY,
};

/// A single edit to an activity, tagged by the camelCase field name.
///
/// On the wire this is the `{ "field": "...", "value": ... }` pair of a
/// field-update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldChange {
    #[serde(with = "serde_tolerant::option")]
    StartDate(Option<Date>),
    DurationDays(u32),
    ProgressPercent(i32),
    HoursUsed(u32),
    Task(String),
    Assignees(Assignees),
    ProjectOwner(String),
    Notes(String),
    #[serde(with = "serde_tolerant::option")]
    PlannedStart(Option<Date>),
    #[serde(with = "serde_tolerant::option")]
    PlannedEnd(Option<Date>),
}

impl FieldChange {
    /// Field names accepted by [`FieldChange::from_parts`].
    pub const FIELDS: [&'static str; 10] = [
        "startDate",
        "durationDays",
        "progressPercent",
        "hoursUsed",
        "task",
        "assignees",
        "projectOwner",
        "notes",
        "plannedStart",
        "plannedEnd",
    ];

    /// Build a change from a field name and a JSON value of that field's
    /// native type.
    pub fn from_parts(field: &str, value: serde_json::Value) -> Result<Self> {
        if !Self::FIELDS.contains(&field) {
            return Err(Error::UnknownField(field.to_string()));
        }

        serde_json::from_value(json!({ "field": field, "value": value }))
            .map_err(|e| Error::invalid_value(field, e.to_string()))
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FieldChange::StartDate(_) => "startDate",
            FieldChange::DurationDays(_) => "durationDays",
            FieldChange::ProgressPercent(_) => "progressPercent",
            FieldChange::HoursUsed(_) => "hoursUsed",
            FieldChange::Task(_) => "task",
            FieldChange::Assignees(_) => "assignees",
            FieldChange::ProjectOwner(_) => "projectOwner",
            FieldChange::Notes(_) => "notes",
            FieldChange::PlannedStart(_) => "plannedStart",
            FieldChange::PlannedEnd(_) => "plannedEnd",
        }
    }
}

pub fn status_for(progress_percent: i32) -> ActivityStatus {
    ActivityStatus::from_progress(progress_percent)
}

/// An absent due date is on time.
pub fn schedule_state_for(due_date: Option<Date>, today: Date) -> ScheduleState {
    match due_date {
        Some(due) if dates::is_before(due, today) => ScheduleState::Late,
        _ => ScheduleState::OnTime,
    }
}

pub fn planned_hours_for(duration_days: u32) -> u64 {
    u64::from(duration_days) * HOURS_PER_DAY
}

pub fn hours_variance_for(hours_used: u32, planned_hours: u64) -> i64 {
    i64::from(hours_used) - i64::try_from(planned_hours).unwrap_or(i64::MAX)
}

/// `start_date + duration_days`, absent when there is no start date or the
/// sum leaves the calendar.
pub fn due_date_for(start_date: Option<Date>, duration_days: u32) -> Option<Date> {
    let start = start_date?;
    match dates::add_days(start, i64::from(duration_days)) {
        Ok(due) => Some(due),
        Err(e) => {
            tracing::debug!("Due date not representable, leaving it empty: {}", e);
            None
        }
    }
}

fn refresh_schedule(record: &mut Activity, today: Date) {
    record.due_date = due_date_for(record.start_date, record.duration_days);
    record.schedule_state = schedule_state_for(record.due_date, today);
}

fn refresh_hours(record: &mut Activity) {
    record.planned_hours = planned_hours_for(record.duration_days);
    record.hours_variance = hours_variance_for(record.hours_used, record.planned_hours);
}

/// Apply `change` and recompute the derived fields it feeds, judging the
/// schedule against `today`.
pub fn recompute_at(mut record: Activity, change: FieldChange, today: Date) -> Activity {
    match change {
        FieldChange::StartDate(start_date) => {
            record.start_date = start_date;
            refresh_schedule(&mut record, today);
        }
        FieldChange::DurationDays(days) => {
            record.duration_days = days;
            refresh_schedule(&mut record, today);
            refresh_hours(&mut record);
        }
        FieldChange::ProgressPercent(progress) => {
            record.progress_percent = progress;
            record.status = status_for(progress);
        }
        FieldChange::HoursUsed(hours) => {
            record.hours_used = hours;
            record.hours_variance = hours_variance_for(hours, record.planned_hours);
        }
        FieldChange::Task(task) => record.task = task,
        FieldChange::Assignees(assignees) => record.assignees = assignees,
        FieldChange::ProjectOwner(owner) => record.project_owner = owner,
        FieldChange::Notes(notes) => record.notes = notes,
        FieldChange::PlannedStart(date) => record.planned_start = date,
        FieldChange::PlannedEnd(date) => record.planned_end = date,
    }

    record
}

/// [`recompute_at`] against today's local date.
pub fn recompute(record: Activity, change: FieldChange) -> Activity {
    recompute_at(record, change, dates::today_local())
}

/// Recompute every derived field from the manual inputs.
pub fn refresh_derived(mut record: Activity, today: Date) -> Activity {
    refresh_schedule(&mut record, today);
    refresh_hours(&mut record);
    record.status = status_for(record.progress_percent);
    record
}

/// Like [`recompute_at`] but taking the value as raw text, the way a form
/// submits it. Unparsable dates and numbers are errors instead of being
/// treated as absent; empty date text still clears the field.
pub fn recompute_strict(record: Activity, field: &str, raw: &str, today: Date) -> Result<Activity> {
    let strict_date = |text: &str| -> Result<Option<Date>> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(dates::parse_strict(text)?))
        }
    };
    let number = |text: &str| -> Result<u32> {
        text.trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| Error::invalid_value(field, e.to_string()))
    };

    let change = match field {
        "startDate" => FieldChange::StartDate(strict_date(raw)?),
        "plannedStart" => FieldChange::PlannedStart(strict_date(raw)?),
        "plannedEnd" => FieldChange::PlannedEnd(strict_date(raw)?),
        "durationDays" => FieldChange::DurationDays(number(raw)?),
        "hoursUsed" => FieldChange::HoursUsed(number(raw)?),
        "progressPercent" => FieldChange::ProgressPercent(
            raw.trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| Error::invalid_value(field, e.to_string()))?,
        ),
        "task" => FieldChange::Task(raw.to_string()),
        "assignees" => FieldChange::Assignees(Assignees::parse(raw)),
        "projectOwner" => FieldChange::ProjectOwner(raw.to_string()),
        "notes" => FieldChange::Notes(raw.to_string()),
        other => return Err(Error::UnknownField(other.to_string())),
    };

    Ok(recompute_at(record, change, today))
}
