//! Dashboard overview: headline counters plus the per-person rollups over a
//! filtered slice of the data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    rollup::{
        aggregate_by_assignee, aggregate_by_project_owner, mean_rounded, AssigneeStats,
        ProjectOwnerStats,
    },
    Activity, ActivityStatus, Project, ScheduleState,
};

/// Text filters are case-insensitive substring matches; enum filters are
/// exact. Unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverviewFilter {
    pub project_name: Option<String>,
    pub project_owner: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<ActivityStatus>,
    pub schedule_state: Option<ScheduleState>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `None` and blank filters match anything.
fn text_filter(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().map(str::trim).filter(|f| !f.is_empty())
}

impl OverviewFilter {
    pub fn matches_project(&self, project: &Project) -> bool {
        text_filter(&self.project_name).map_or(true, |f| contains_ignore_case(&project.name, f))
            && text_filter(&self.project_owner).map_or(true, |f| project.assignees.any_matches(f))
    }

    pub fn matches_activity(&self, activity: &Activity) -> bool {
        text_filter(&self.project_name)
            .map_or(true, |f| contains_ignore_case(&activity.project_name, f))
            && text_filter(&self.project_owner)
                .map_or(true, |f| contains_ignore_case(&activity.project_owner, f))
            && text_filter(&self.assignee).map_or(true, |f| activity.assignees.any_matches(f))
            && self.status.map_or(true, |s| activity.status == s)
            && self
                .schedule_state
                .map_or(true, |s| activity.schedule_state == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_projects: usize,
    pub total_activities: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub not_started_count: usize,
    pub cancelled_count: usize,
    pub on_time_count: usize,
    pub late_count: usize,
    pub average_progress_percent: i64,
    pub by_project_owner: IndexMap<String, ProjectOwnerStats>,
    pub by_assignee: IndexMap<String, AssigneeStats>,
}

pub fn overview(activities: &[Activity], projects: &[Project], filter: &OverviewFilter) -> Overview {
    let projects: Vec<Project> = projects
        .iter()
        .filter(|p| filter.matches_project(p))
        .cloned()
        .collect();
    let activities: Vec<Activity> = activities
        .iter()
        .filter(|a| filter.matches_activity(a))
        .cloned()
        .collect();

    let status_count =
        |status: ActivityStatus| activities.iter().filter(|a| a.status == status).count();
    let late_count = activities
        .iter()
        .filter(|a| a.schedule_state == ScheduleState::Late)
        .count();

    Overview {
        total_projects: projects.len(),
        total_activities: activities.len(),
        completed_count: status_count(ActivityStatus::Completed),
        in_progress_count: status_count(ActivityStatus::InProgress),
        not_started_count: status_count(ActivityStatus::NotStarted),
        cancelled_count: status_count(ActivityStatus::Cancelled),
        on_time_count: activities.len() - late_count,
        late_count,
        average_progress_percent: mean_rounded(
            activities.iter().map(|a| i64::from(a.progress_percent)),
        ),
        by_project_owner: aggregate_by_project_owner(&activities, &projects),
        by_assignee: aggregate_by_assignee(&activities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recalc::{recompute_at, FieldChange};
    use time::{macros::date, Date};

    const TODAY: Date = date!(2024 - 06 - 01);

    fn fixture() -> (Vec<Activity>, Vec<Project>) {
        let projects = vec![
            Project::new("PRJ01", "Portal do Cliente").with_assignees("Carla"),
            Project::new("PRJ02", "Data Lake").with_assignees("Davi"),
        ];
        let activity = |code: &str, project: &Project, assignees: &str, progress: i32| {
            recompute_at(
                Activity::new(code, "tarefa")
                    .with_project(project.code.clone(), project.name.clone())
                    .with_project_owner(project.assignees.joined())
                    .with_assignees(assignees)
                    .with_start_date(date!(2024 - 05 - 01))
                    .refreshed(TODAY),
                FieldChange::ProgressPercent(progress),
                TODAY,
            )
        };
        let activities = vec![
            activity("A1", &projects[0], "Ana", 100),
            activity("A2", &projects[0], "Ana, Bruno", 50),
            activity("A3", &projects[1], "Bruno", 0),
        ];
        (activities, projects)
    }

    #[test]
    fn unfiltered_overview_counts_everything() {
        let (activities, projects) = fixture();
        let overview = overview(&activities, &projects, &OverviewFilter::default());

        assert_eq!(overview.total_projects, 2);
        assert_eq!(overview.total_activities, 3);
        assert_eq!(overview.completed_count, 1);
        assert_eq!(overview.in_progress_count, 1);
        assert_eq!(overview.not_started_count, 1);
        assert_eq!(overview.late_count, 3);
        assert_eq!(overview.on_time_count, 0);
        assert_eq!(overview.average_progress_percent, 50);
        assert_eq!(overview.by_assignee["Bruno"].task_count, 2);
        assert_eq!(overview.by_project_owner["Carla"].task_count, 2);
    }

    #[test]
    fn filters_narrow_both_collections() {
        let (activities, projects) = fixture();
        let filter = OverviewFilter {
            project_name: Some("portal".into()),
            ..Default::default()
        };
        let overview = overview(&activities, &projects, &filter);

        assert_eq!(overview.total_projects, 1);
        assert_eq!(overview.total_activities, 2);
        assert_eq!(overview.by_project_owner.keys().collect::<Vec<_>>(), vec!["Carla"]);
        assert_eq!(overview.average_progress_percent, 75);
    }

    #[test]
    fn enum_and_assignee_filters_apply_to_activities() {
        let (activities, projects) = fixture();
        let filter = OverviewFilter {
            assignee: Some("BRU".into()),
            status: Some(ActivityStatus::InProgress),
            ..Default::default()
        };
        let overview = overview(&activities, &projects, &filter);

        assert_eq!(overview.total_projects, 2);
        assert_eq!(overview.total_activities, 1);
        assert_eq!(overview.by_assignee["Ana"].in_progress_count, 1);
    }

    #[test]
    fn blank_filters_match_everything() {
        let (activities, projects) = fixture();
        let filter = OverviewFilter {
            project_owner: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(overview(&activities, &projects, &filter).total_activities, 3);
    }

    #[test]
    fn empty_input_has_zero_average() {
        let overview = overview(&[], &[], &OverviewFilter::default());
        assert_eq!(overview.average_progress_percent, 0);
        assert!(overview.by_assignee.is_empty());
    }
}
