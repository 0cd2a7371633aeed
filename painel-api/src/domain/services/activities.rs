use std::sync::Arc;

use painel::{
    dates, normalize_project_key, recompute, refresh_derived, rollup::resolve_project_key,
    Activity, FieldChange, Project,
};

use crate::{
    domain::{
        models::{RecordId, Stored},
        ports::outbound::{RecordRepository, SubtaskRepository},
    },
    repositories::RepositoryError,
};

/// Writes activities with their derived fields and project link kept
/// consistent. Derived values sent by clients are always overwritten.
pub struct ActivityService {
    activities: Arc<dyn RecordRepository<Activity>>,
    projects: Arc<dyn RecordRepository<Project>>,
    subtasks: Arc<dyn SubtaskRepository>,
}

impl ActivityService {
    pub fn new(
        activities: Arc<dyn RecordRepository<Activity>>,
        projects: Arc<dyn RecordRepository<Project>>,
        subtasks: Arc<dyn SubtaskRepository>,
    ) -> Self {
        Self {
            activities,
            projects,
            subtasks,
        }
    }

    async fn link_project(&self, mut activity: Activity) -> Result<Activity, RepositoryError> {
        let explicit = activity
            .project_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(normalize_project_key);

        activity.project_key = match explicit {
            Some(key) => Some(key),
            None => {
                let projects: Vec<Project> = self
                    .projects
                    .list()
                    .await?
                    .into_iter()
                    .map(Stored::into_record)
                    .collect();
                resolve_project_key(&activity, &projects)
            }
        };
        Ok(activity)
    }

    pub async fn create(&self, activity: Activity) -> Result<Stored<Activity>, RepositoryError> {
        let activity = self.link_project(activity).await?;
        let activity = refresh_derived(activity, dates::today_local());

        let stored = self.activities.create(&activity).await?;
        tracing::info!(
            "Created activity {} ({}) linked to {:?}",
            stored.id,
            stored.record.code,
            stored.record.project_key
        );
        Ok(stored)
    }

    /// Full-record replacement; every derived field is recomputed.
    pub async fn replace(
        &self,
        id: RecordId,
        activity: Activity,
    ) -> Result<Stored<Activity>, RepositoryError> {
        let activity = self.link_project(activity).await?;
        let activity = refresh_derived(activity, dates::today_local());

        self.activities.update(id, &activity).await
    }

    /// Single-field edit; only the derived fields the field feeds change.
    pub async fn apply_change(
        &self,
        id: RecordId,
        change: FieldChange,
    ) -> Result<Stored<Activity>, RepositoryError> {
        let current = self.activities.get(id).await?;
        let field = change.field_name();
        let updated = recompute(current.record, change);

        let stored = self.activities.update(id, &updated).await?;
        tracing::debug!("Activity {} field {} updated", id, field);
        Ok(stored)
    }

    /// Delete an activity together with its subtasks. Postgres cascades the
    /// subtask rows; the sweep is for stores without a foreign key.
    pub async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        self.activities.delete(id).await?;
        let swept = self.subtasks.delete_for_activity(id).await?;

        tracing::info!("Deleted activity {} ({} subtasks swept)", id, swept);
        Ok(())
    }
}
