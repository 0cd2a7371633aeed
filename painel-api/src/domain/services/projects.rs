use std::sync::Arc;

use itertools::Itertools;
use painel::{rollup::belongs_to, Activity, Project};

use crate::{
    domain::{
        models::{RecordId, Stored},
        ports::outbound::RecordRepository,
    },
    repositories::RepositoryError,
};

pub struct ProjectService {
    projects: Arc<dyn RecordRepository<Project>>,
    activities: Arc<dyn RecordRepository<Activity>>,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn RecordRepository<Project>>,
        activities: Arc<dyn RecordRepository<Activity>>,
    ) -> Self {
        Self {
            projects,
            activities,
        }
    }

    /// Codes of the activities matched to `project` that `keep` rejects.
    async fn linked_activities(
        &self,
        project: &Project,
        keep: impl Fn(&Activity) -> bool,
    ) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .activities
            .list()
            .await?
            .into_iter()
            .filter(|a| belongs_to(&a.record, project) && !keep(&a.record))
            .map(|a| a.record.code)
            .collect())
    }

    /// Refused with `Conflict` when an activity that belongs to the project
    /// would no longer match it after the update.
    pub async fn update(
        &self,
        id: RecordId,
        project: Project,
    ) -> Result<Stored<Project>, RepositoryError> {
        let current = self.projects.get(id).await?;
        let orphaned = self
            .linked_activities(&current.record, |a| belongs_to(a, &project))
            .await?;

        if !orphaned.is_empty() {
            tracing::warn!(
                "Refusing to update project {} as {}: {} linked activities would be orphaned",
                current.record.code,
                project.code,
                orphaned.len()
            );
            return Err(RepositoryError::Conflict(format!(
                "project {} still has linked activities: {}",
                current.record.code,
                orphaned.iter().join(", ")
            )));
        }

        self.projects.update(id, &project).await
    }

    /// Refused with `Conflict` while any activity still belongs to the project.
    pub async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        let project = self.projects.get(id).await?;
        let linked = self.linked_activities(&project.record, |_| false).await?;

        if !linked.is_empty() {
            tracing::warn!(
                "Refusing to delete project {} with {} linked activities",
                project.record.code,
                linked.len()
            );
            return Err(RepositoryError::Conflict(format!(
                "project {} still has linked activities: {}",
                project.record.code,
                linked.iter().join(", ")
            )));
        }

        self.projects.delete(id).await?;
        tracing::info!("Deleted project {} ({})", id, project.record.code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryRepository;

    #[tokio::test]
    async fn delete_is_refused_while_activities_are_linked() {
        let projects = Arc::new(MemoryRepository::<Project>::new());
        let activities = Arc::new(MemoryRepository::<Activity>::new());
        let service = ProjectService::new(projects.clone(), activities.clone());

        let project = projects.create(&Project::new("PRJ01", "Portal")).await.unwrap();
        let activity = activities
            .create(&Activity::new("AT1", "t").with_project_key("PRJ01"))
            .await
            .unwrap();

        assert!(matches!(
            service.delete(project.id).await,
            Err(RepositoryError::Conflict(_))
        ));

        activities.delete(activity.id).await.unwrap();
        service.delete(project.id).await.unwrap();
        assert!(projects.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_linked_activities_attached() {
        let projects = Arc::new(MemoryRepository::<Project>::new());
        let activities = Arc::new(MemoryRepository::<Activity>::new());
        let service = ProjectService::new(projects.clone(), activities.clone());

        let project = projects.create(&Project::new("PRJ01", "Portal")).await.unwrap();
        activities
            .create(&Activity::new("AT1", "t").with_project_key("PRJ01"))
            .await
            .unwrap();

        assert!(matches!(
            service.update(project.id, Project::new("PRJ99", "Portal")).await,
            Err(RepositoryError::Conflict(message)) if message.contains("AT1")
        ));
        assert_eq!(projects.get(project.id).await.unwrap().record.code, "PRJ01");

        // same key, new name
        let renamed = service
            .update(project.id, Project::new("PRJ01", "Portal do Cliente"))
            .await
            .unwrap();
        assert_eq!(renamed.record.name, "Portal do Cliente");
    }

    #[tokio::test]
    async fn update_without_linked_activities_may_change_code() {
        let projects = Arc::new(MemoryRepository::<Project>::new());
        let activities = Arc::new(MemoryRepository::<Activity>::new());
        let service = ProjectService::new(projects.clone(), activities.clone());

        let project = projects.create(&Project::new("PRJ01", "Portal")).await.unwrap();
        let updated = service
            .update(project.id, Project::new("PRJ99", "Portal"))
            .await
            .unwrap();
        assert_eq!(updated.record.code, "PRJ99");
    }
}
