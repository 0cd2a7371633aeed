use std::sync::Arc;

use painel::{Activity, Person, Project, Subtask};
use sqlx::PgPool;

use crate::{
    domain::{
        ports::outbound::{RecordRepository, SubtaskRepository},
        services::{ActivityService, ProjectService},
    },
    repositories::{
        ActivityRepositoryImpl, MemoryRepository, PersonRepositoryImpl, ProjectRepositoryImpl,
        SubtaskRepositoryImpl,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub project_repo: Arc<dyn RecordRepository<Project>>,
    pub person_repo: Arc<dyn RecordRepository<Person>>,
    pub activity_repo: Arc<dyn RecordRepository<Activity>>,
    pub subtask_repo: Arc<dyn SubtaskRepository>,
    pub activity_service: Arc<ActivityService>,
    pub project_service: Arc<ProjectService>,
}

impl AppState {
    pub fn new(
        project_repo: Arc<dyn RecordRepository<Project>>,
        person_repo: Arc<dyn RecordRepository<Person>>,
        activity_repo: Arc<dyn RecordRepository<Activity>>,
        subtask_repo: Arc<dyn SubtaskRepository>,
    ) -> Self {
        let activity_service = Arc::new(ActivityService::new(
            activity_repo.clone(),
            project_repo.clone(),
            subtask_repo.clone(),
        ));
        let project_service = Arc::new(ProjectService::new(
            project_repo.clone(),
            activity_repo.clone(),
        ));

        Self {
            project_repo,
            person_repo,
            activity_repo,
            subtask_repo,
            activity_service,
            project_service,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(ProjectRepositoryImpl::new(pool.clone())),
            Arc::new(PersonRepositoryImpl::new(pool.clone())),
            Arc::new(ActivityRepositoryImpl::new(pool.clone())),
            Arc::new(SubtaskRepositoryImpl::new(pool)),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryRepository::<Project>::new()),
            Arc::new(MemoryRepository::<Person>::new()),
            Arc::new(MemoryRepository::<Activity>::new()),
            Arc::new(MemoryRepository::<Subtask>::new()),
        )
    }
}
