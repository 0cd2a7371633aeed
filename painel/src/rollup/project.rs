use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::Date;

use super::{belongs_to, mean_rounded};
use crate::{dates::serde_tolerant, Activity, ActivityStatus, Project, ScheduleState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_activities: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub cancelled_count: usize,
    pub not_started_count: usize,
    pub on_time_count: usize,
    pub late_count: usize,
    pub total_planned_hours: u64,
    pub total_hours_used: u64,
    pub total_hours_variance: i64,
    /// Cancelled activities count with their `-1`.
    pub average_progress_percent: i64,
    #[serde(default, with = "serde_tolerant::option")]
    pub earliest_start_date: Option<Date>,
    #[serde(default, with = "serde_tolerant::option")]
    pub latest_due_date: Option<Date>,
}

impl ProjectStats {
    pub fn from_activities<'a, I>(activities: I) -> Self
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        let activities: Vec<&Activity> = activities.into_iter().collect();
        let mut stats = ProjectStats {
            total_activities: activities.len(),
            average_progress_percent: mean_rounded(
                activities.iter().map(|a| i64::from(a.progress_percent)),
            ),
            earliest_start_date: activities.iter().filter_map(|a| a.start_date).min(),
            latest_due_date: activities.iter().filter_map(|a| a.due_date).max(),
            ..Default::default()
        };

        for activity in activities {
            match activity.status {
                ActivityStatus::Completed => stats.completed_count += 1,
                ActivityStatus::InProgress => stats.in_progress_count += 1,
                ActivityStatus::Cancelled => stats.cancelled_count += 1,
                ActivityStatus::NotStarted => stats.not_started_count += 1,
            }
            match activity.schedule_state {
                ScheduleState::OnTime => stats.on_time_count += 1,
                ScheduleState::Late => stats.late_count += 1,
            }
            stats.total_planned_hours += activity.planned_hours;
            stats.total_hours_used += u64::from(activity.hours_used);
            stats.total_hours_variance += activity.hours_variance;
        }

        stats
    }
}

/// Statistics per project code over the activities belonging to each project.
///
/// An activity matching several projects counts toward each of them.
pub fn aggregate_by_project(
    activities: &[Activity],
    projects: &[Project],
) -> IndexMap<String, ProjectStats> {
    projects
        .iter()
        .map(|project| {
            let matched = activities.iter().filter(|a| belongs_to(a, project));
            (project.code.clone(), ProjectStats::from_activities(matched))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recalc::{recompute_at, FieldChange};
    use time::macros::date;

    const TODAY: Date = date!(2024 - 06 - 01);

    fn activity(code: &str, project: &str, progress: i32) -> Activity {
        recompute_at(
            Activity::new(code, "tarefa").with_project(project, ""),
            FieldChange::ProgressPercent(progress),
            TODAY,
        )
    }

    #[test]
    fn counts_and_averages_matched_activities() {
        let activities = vec![activity("A1", "PRJ01", 100), activity("A2", "PRJ01", 50)];
        let projects = vec![Project::new("PRJ01", "Portal")];

        let stats = aggregate_by_project(&activities, &projects);
        let prj = &stats["PRJ01"];

        assert_eq!(prj.total_activities, 2);
        assert_eq!(prj.completed_count, 1);
        assert_eq!(prj.in_progress_count, 1);
        assert_eq!(prj.average_progress_percent, 75);
        assert_eq!(prj.total_planned_hours, 70);
        assert_eq!(prj.total_hours_variance, -70);
    }

    #[test]
    fn project_without_activities_is_all_zero() {
        let activities = vec![activity("A1", "PRJ01", 100)];
        let projects = vec![Project::new("PRJ02", "Vazio")];

        let stats = aggregate_by_project(&activities, &projects);

        assert_eq!(stats["PRJ02"], ProjectStats::default());
        assert_eq!(stats["PRJ02"].average_progress_percent, 0);
    }

    #[test]
    fn date_bounds_skip_empty_dates() {
        let first = Activity::new("A1", "t")
            .with_project("PRJ01", "")
            .with_start_date(date!(2024 - 03 - 01))
            .with_duration_days(30)
            .refreshed(TODAY);
        let second = Activity::new("A2", "t")
            .with_project("PRJ01", "")
            .with_start_date(date!(2024 - 02 - 10))
            .refreshed(TODAY);
        let undated = activity("A3", "PRJ01", 0);

        let stats = aggregate_by_project(&[first, second, undated], &[Project::new("PRJ01", "P")]);
        let prj = &stats["PRJ01"];

        assert_eq!(prj.earliest_start_date, Some(date!(2024 - 02 - 10)));
        assert_eq!(prj.latest_due_date, Some(date!(2024 - 03 - 31)));
        assert_eq!(prj.late_count, 2);
        assert_eq!(prj.on_time_count, 1);
    }

    #[test]
    fn cancelled_progress_pulls_the_average_down() {
        let activities = vec![activity("A1", "PRJ01", -1), activity("A2", "PRJ01", 0)];
        let stats = aggregate_by_project(&activities, &[Project::new("PRJ01", "P")]);
        assert_eq!(stats["PRJ01"].cancelled_count, 1);
        assert_eq!(stats["PRJ01"].not_started_count, 1);
        assert_eq!(stats["PRJ01"].average_progress_percent, 0);
    }

    #[test]
    fn output_follows_project_order_and_is_deterministic() {
        let activities = vec![activity("A1", "PRJ02", 10), activity("A2", "PRJ01", 20)];
        let projects = vec![Project::new("PRJ02", "B"), Project::new("PRJ01", "A")];

        let first = aggregate_by_project(&activities, &projects);
        let second = aggregate_by_project(&activities, &projects);

        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["PRJ02", "PRJ01"]);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn serializes_camel_case_with_iso_dates() {
        let stats = ProjectStats {
            earliest_start_date: Some(date!(2024 - 01 - 10)),
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["earliestStartDate"], "2024-01-10");
        assert_eq!(json["latestDueDate"], serde_json::Value::Null);
        assert_eq!(json["averageProgressPercent"], 0);
    }
}
