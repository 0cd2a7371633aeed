use itertools::Itertools;
use tracing::warn;

use crate::{normalize_project_key, Activity, Project};

/// Compatibility rule for activities written before `project_key` existed.
///
/// The activity's reference (its project code text, or its project name when
/// there is no code) matches when it equals the project's code or name, when
/// its project name equals the project's name, or when the reference
/// contains the project's code. The substring case is ambiguous when one
/// code is a prefix of another.
pub fn legacy_project_match(activity: &Activity, project: &Project) -> bool {
    let reference = activity.project_reference();
    if reference.is_empty() && activity.project_name.is_empty() {
        return false;
    }

    (!project.code.is_empty()
        && (reference == project.code || reference.contains(project.code.as_str())))
        || (!project.name.is_empty()
            && (reference == project.name || activity.project_name == project.name))
}

/// Whether `activity` belongs to `project`: exact key match when the activity
/// carries a resolved key, the legacy rule otherwise.
pub fn belongs_to(activity: &Activity, project: &Project) -> bool {
    match &activity.project_key {
        Some(key) => normalize_project_key(key) == project.key(),
        None => legacy_project_match(activity, project),
    }
}

/// Resolve the key of the single project `activity` refers to.
///
/// Exact code/name matches win over substring matches. `None` when nothing
/// matches or the reference is ambiguous.
pub fn resolve_project_key(activity: &Activity, projects: &[Project]) -> Option<String> {
    let reference = activity.project_reference();
    let exact: Vec<&Project> = projects
        .iter()
        .filter(|p| {
            (!reference.is_empty() && (reference == p.code || reference == p.name))
                || (!activity.project_name.is_empty() && activity.project_name == p.name)
        })
        .collect();

    let candidates = if exact.is_empty() {
        projects
            .iter()
            .filter(|p| legacy_project_match(activity, p))
            .collect()
    } else {
        exact
    };

    match candidates.as_slice() {
        [] => None,
        [project] => Some(project.key()),
        many => {
            warn!(
                "Activity {} refers ambiguously to projects [{}], leaving it unlinked",
                activity.code,
                many.iter().map(|p| p.code.as_str()).join(", ")
            );
            None
        }
    }
}
