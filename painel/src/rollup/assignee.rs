use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Activity, ActivityStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeStats {
    pub task_count: usize,
    pub distinct_project_count: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub cancelled_count: usize,
}

#[derive(Default)]
struct AssigneeTally<'a> {
    stats: AssigneeStats,
    projects: HashSet<&'a str>,
}

/// Statistics per co-assignee. An activity with N assignees counts in full
/// toward each of the N buckets.
pub fn aggregate_by_assignee(activities: &[Activity]) -> IndexMap<String, AssigneeStats> {
    let mut tallies: IndexMap<&str, AssigneeTally> = IndexMap::new();

    for activity in activities {
        for name in activity.assignees.iter() {
            let tally = tallies.entry(name).or_default();
            tally.stats.task_count += 1;
            match activity.status {
                ActivityStatus::Completed => tally.stats.completed_count += 1,
                ActivityStatus::InProgress => tally.stats.in_progress_count += 1,
                ActivityStatus::Cancelled => tally.stats.cancelled_count += 1,
                ActivityStatus::NotStarted => {}
            }

            let project = activity.project_label();
            if !project.is_empty() {
                tally.projects.insert(project);
            }
        }
    }

    tallies
        .into_iter()
        .map(|(name, tally)| {
            let stats = AssigneeStats {
                distinct_project_count: tally.projects.len(),
                ..tally.stats
            };
            (name.to_string(), stats)
        })
        .collect()
}
