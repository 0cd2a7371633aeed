use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use painel::Subtask;
use tracing::instrument;

use super::{require, ApiError, Message};
use crate::{
    app_state::AppState,
    domain::models::{RecordId, Stored},
    repositories::RepositoryError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subtasks).post(create_subtask))
        .route("/activity/:activity_id", get(list_activity_subtasks))
        .route(
            "/:id",
            get(get_subtask).put(update_subtask).delete(delete_subtask),
        )
}

/// Required fields, plus the parent activity must exist.
async fn validate(app_state: &AppState, subtask: &Subtask) -> Result<(), ApiError> {
    require(&[("code", subtask.code.as_str()), ("name", subtask.name.as_str())])?;

    match app_state
        .activity_repo
        .get(RecordId::new(subtask.activity_id))
        .await
    {
        Ok(_) => Ok(()),
        Err(RepositoryError::NotFound(_)) => Err(ApiError::bad_request(format!(
            "activity {} does not exist",
            subtask.activity_id
        ))),
        Err(e) => Err(e.into()),
    }
}

#[instrument(name = "GET /subtasks", skip(app_state))]
async fn list_subtasks(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Stored<Subtask>>>, ApiError> {
    Ok(Json(app_state.subtask_repo.list().await?))
}

#[instrument(name = "GET /subtasks/activity/:activity_id", skip(app_state))]
async fn list_activity_subtasks(
    State(app_state): State<AppState>,
    Path(activity_id): Path<RecordId>,
) -> Result<Json<Vec<Stored<Subtask>>>, ApiError> {
    Ok(Json(
        app_state.subtask_repo.list_for_activity(activity_id).await?,
    ))
}

#[instrument(name = "GET /subtasks/:id", skip(app_state))]
async fn get_subtask(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Stored<Subtask>>, ApiError> {
    Ok(Json(app_state.subtask_repo.get(id).await?))
}

#[instrument(name = "POST /subtasks", skip(app_state, payload))]
async fn create_subtask(
    State(app_state): State<AppState>,
    payload: Result<Json<Subtask>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Subtask>>), ApiError> {
    let Json(subtask) = payload?;
    validate(&app_state, &subtask).await?;

    let stored = app_state.subtask_repo.create(&subtask).await?;
    tracing::info!(
        "Created subtask {} ({}) under activity {}",
        stored.id,
        stored.record.code,
        stored.record.activity_id
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

#[instrument(name = "PUT /subtasks/:id", skip(app_state, payload))]
async fn update_subtask(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
    payload: Result<Json<Subtask>, JsonRejection>,
) -> Result<Json<Stored<Subtask>>, ApiError> {
    let Json(subtask) = payload?;
    validate(&app_state, &subtask).await?;

    Ok(Json(app_state.subtask_repo.update(id, &subtask).await?))
}

#[instrument(name = "DELETE /subtasks/:id", skip(app_state))]
async fn delete_subtask(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Message>, ApiError> {
    app_state.subtask_repo.delete(id).await?;
    Ok(Message::new("Subtask deleted"))
}
