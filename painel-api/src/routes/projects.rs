use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use painel::Project;
use tracing::instrument;

use super::{require, ApiError, Message};
use crate::{
    app_state::AppState,
    domain::models::{RecordId, Stored},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

fn validate(project: &Project) -> Result<(), ApiError> {
    require(&[("code", project.code.as_str()), ("name", project.name.as_str())])
}

#[instrument(name = "GET /projects", skip(app_state))]
async fn list_projects(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Stored<Project>>>, ApiError> {
    let projects = app_state.project_repo.list().await?;
    Ok(Json(projects))
}

#[instrument(name = "GET /projects/:id", skip(app_state))]
async fn get_project(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Stored<Project>>, ApiError> {
    let project = app_state.project_repo.get(id).await?;
    Ok(Json(project))
}

#[instrument(name = "POST /projects", skip(app_state, payload))]
async fn create_project(
    State(app_state): State<AppState>,
    payload: Result<Json<Project>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Project>>), ApiError> {
    let Json(project) = payload?;
    validate(&project)?;

    let stored = app_state.project_repo.create(&project).await?;
    tracing::info!("Created project {} ({})", stored.id, stored.record.code);

    Ok((StatusCode::CREATED, Json(stored)))
}

#[instrument(name = "PUT /projects/:id", skip(app_state, payload))]
async fn update_project(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
    payload: Result<Json<Project>, JsonRejection>,
) -> Result<Json<Stored<Project>>, ApiError> {
    let Json(project) = payload?;
    validate(&project)?;

    let stored = app_state.project_service.update(id, project).await?;
    Ok(Json(stored))
}

#[instrument(name = "DELETE /projects/:id", skip(app_state))]
async fn delete_project(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Message>, ApiError> {
    app_state.project_service.delete(id).await?;
    Ok(Message::new("Project deleted"))
}
