use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::belongs_to;
use crate::{Activity, ActivityStatus, Project};

/// Workload of a person listed among a project's assignees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOwnerStats {
    pub project_count: usize,
    pub task_count: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub cancelled_count: usize,
}

/// Statistics per project assignee, counting the activities that belong to
/// each of their projects.
pub fn aggregate_by_project_owner(
    activities: &[Activity],
    projects: &[Project],
) -> IndexMap<String, ProjectOwnerStats> {
    let mut owners: IndexMap<String, ProjectOwnerStats> = IndexMap::new();

    for project in projects {
        let matched: Vec<&Activity> = activities
            .iter()
            .filter(|a| belongs_to(a, project))
            .collect();
        let count = |status: ActivityStatus| matched.iter().filter(|a| a.status == status).count();

        for owner in project.assignees.iter() {
            let stats = owners.entry(owner.to_string()).or_default();
            stats.project_count += 1;
            stats.task_count += matched.len();
            stats.completed_count += count(ActivityStatus::Completed);
            stats.in_progress_count += count(ActivityStatus::InProgress);
            stats.cancelled_count += count(ActivityStatus::Cancelled);
        }
    }

    owners
}
