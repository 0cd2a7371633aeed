use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use painel::{Activity, FieldChange};
use serde::Deserialize;
use tracing::instrument;

use super::{require, ApiError, Message};
use crate::{
    app_state::AppState,
    domain::models::{RecordId, Stored},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route(
            "/:id",
            get(get_activity)
                .put(replace_activity)
                .patch(update_activity_field)
                .delete(delete_activity),
        )
}

fn validate(activity: &Activity) -> Result<(), ApiError> {
    require(&[("code", activity.code.as_str()), ("task", activity.task.as_str())])
}

#[instrument(name = "GET /activities", skip(app_state))]
async fn list_activities(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Stored<Activity>>>, ApiError> {
    Ok(Json(app_state.activity_repo.list().await?))
}

#[instrument(name = "GET /activities/:id", skip(app_state))]
async fn get_activity(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Stored<Activity>>, ApiError> {
    Ok(Json(app_state.activity_repo.get(id).await?))
}

#[instrument(name = "POST /activities", skip(app_state, payload))]
async fn create_activity(
    State(app_state): State<AppState>,
    payload: Result<Json<Activity>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Activity>>), ApiError> {
    let Json(activity) = payload?;
    validate(&activity)?;

    let stored = app_state.activity_service.create(activity).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[instrument(name = "PUT /activities/:id", skip(app_state, payload))]
async fn replace_activity(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
    payload: Result<Json<Activity>, JsonRejection>,
) -> Result<Json<Stored<Activity>>, ApiError> {
    let Json(activity) = payload?;
    validate(&activity)?;

    Ok(Json(app_state.activity_service.replace(id, activity).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldUpdateBody {
    record_id: Option<RecordId>,
    field: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[instrument(name = "PATCH /activities/:id", skip(app_state, payload))]
async fn update_activity_field(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
    payload: Result<Json<FieldUpdateBody>, JsonRejection>,
) -> Result<Json<Stored<Activity>>, ApiError> {
    let Json(body) = payload?;
    if let Some(record_id) = body.record_id {
        if record_id != id {
            return Err(ApiError::bad_request(format!(
                "recordId {} does not match activity {}",
                record_id, id
            )));
        }
    }

    let change = FieldChange::from_parts(&body.field, body.value)?;
    Ok(Json(app_state.activity_service.apply_change(id, change).await?))
}

#[instrument(name = "DELETE /activities/:id", skip(app_state))]
async fn delete_activity(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Message>, ApiError> {
    app_state.activity_service.delete(id).await?;
    Ok(Message::new("Activity deleted"))
}
