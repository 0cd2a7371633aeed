use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use indexmap::IndexMap;
use painel::{
    metrics::{overview, Overview, OverviewFilter},
    rollup::{
        aggregate_by_assignee, aggregate_by_project, aggregate_by_project_owner, AssigneeStats,
        ProjectOwnerStats, ProjectStats,
    },
    dates, refresh_derived, Activity, Project,
};
use serde::Deserialize;
use tracing::instrument;

use super::ApiError;
use crate::{app_state::AppState, domain::models::Stored};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(stored_project_rollup).post(project_rollup),
        )
        .route(
            "/assignees",
            get(stored_assignee_rollup).post(assignee_rollup),
        )
        .route("/project-owners", get(stored_project_owner_rollup))
        .route("/overview", get(stored_overview))
}

/// Collections supplied by the caller instead of read from storage.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RollupRequest {
    activities: Vec<Activity>,
    projects: Vec<Project>,
}

impl RollupRequest {
    /// Posted activities carry whatever derived values the client sent.
    fn refreshed_activities(self) -> (Vec<Activity>, Vec<Project>) {
        let today = dates::today_local();
        let activities = self
            .activities
            .into_iter()
            .map(|activity| refresh_derived(activity, today))
            .collect();
        (activities, self.projects)
    }
}

/// Repositories list newest first; rollup keys follow creation order.
fn oldest_first<T>(rows: Vec<Stored<T>>) -> Vec<T> {
    rows.into_iter().rev().map(Stored::into_record).collect()
}

async fn load(app_state: &AppState) -> Result<(Vec<Activity>, Vec<Project>), ApiError> {
    let activities = oldest_first(app_state.activity_repo.list().await?);
    let projects = oldest_first(app_state.project_repo.list().await?);
    Ok((activities, projects))
}

#[instrument(name = "GET /rollups/projects", skip(app_state))]
async fn stored_project_rollup(
    State(app_state): State<AppState>,
) -> Result<Json<IndexMap<String, ProjectStats>>, ApiError> {
    let (activities, projects) = load(&app_state).await?;
    Ok(Json(aggregate_by_project(&activities, &projects)))
}

#[instrument(name = "POST /rollups/projects", skip(payload))]
async fn project_rollup(
    payload: Result<Json<RollupRequest>, JsonRejection>,
) -> Result<Json<IndexMap<String, ProjectStats>>, ApiError> {
    let Json(request) = payload?;
    let (activities, projects) = request.refreshed_activities();
    Ok(Json(aggregate_by_project(&activities, &projects)))
}

#[instrument(name = "GET /rollups/assignees", skip(app_state))]
async fn stored_assignee_rollup(
    State(app_state): State<AppState>,
) -> Result<Json<IndexMap<String, AssigneeStats>>, ApiError> {
    let (activities, _) = load(&app_state).await?;
    Ok(Json(aggregate_by_assignee(&activities)))
}

#[instrument(name = "POST /rollups/assignees", skip(payload))]
async fn assignee_rollup(
    payload: Result<Json<RollupRequest>, JsonRejection>,
) -> Result<Json<IndexMap<String, AssigneeStats>>, ApiError> {
    let Json(request) = payload?;
    let (activities, _) = request.refreshed_activities();
    Ok(Json(aggregate_by_assignee(&activities)))
}

#[instrument(name = "GET /rollups/project-owners", skip(app_state))]
async fn stored_project_owner_rollup(
    State(app_state): State<AppState>,
) -> Result<Json<IndexMap<String, ProjectOwnerStats>>, ApiError> {
    let (activities, projects) = load(&app_state).await?;
    Ok(Json(aggregate_by_project_owner(&activities, &projects)))
}

#[instrument(name = "GET /rollups/overview", skip(app_state))]
async fn stored_overview(
    State(app_state): State<AppState>,
    Query(filter): Query<OverviewFilter>,
) -> Result<Json<Overview>, ApiError> {
    let (activities, projects) = load(&app_state).await?;
    Ok(Json(overview(&activities, &projects, &filter)))
}
