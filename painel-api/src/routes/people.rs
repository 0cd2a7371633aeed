use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use painel::Person;
use tracing::instrument;

use super::{require, ApiError, Message};
use crate::{
    app_state::AppState,
    domain::models::{RecordId, Stored},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_people).post(create_person))
        .route(
            "/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
}

#[instrument(name = "GET /people", skip(app_state))]
async fn list_people(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Stored<Person>>>, ApiError> {
    Ok(Json(app_state.person_repo.list().await?))
}

#[instrument(name = "GET /people/:id", skip(app_state))]
async fn get_person(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Stored<Person>>, ApiError> {
    Ok(Json(app_state.person_repo.get(id).await?))
}

#[instrument(name = "POST /people", skip(app_state, payload))]
async fn create_person(
    State(app_state): State<AppState>,
    payload: Result<Json<Person>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Person>>), ApiError> {
    let Json(person) = payload?;
    require(&[("code", person.code.as_str()), ("name", person.name.as_str())])?;

    let stored = app_state.person_repo.create(&person).await?;
    tracing::info!("Created person {} ({})", stored.id, stored.record.code);

    Ok((StatusCode::CREATED, Json(stored)))
}

#[instrument(name = "PUT /people/:id", skip(app_state, payload))]
async fn update_person(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
    payload: Result<Json<Person>, JsonRejection>,
) -> Result<Json<Stored<Person>>, ApiError> {
    let Json(person) = payload?;
    require(&[("code", person.code.as_str()), ("name", person.name.as_str())])?;

    Ok(Json(app_state.person_repo.update(id, &person).await?))
}

#[instrument(name = "DELETE /people/:id", skip(app_state))]
async fn delete_person(
    State(app_state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Message>, ApiError> {
    app_state.person_repo.delete(id).await?;
    tracing::info!("Deleted person {}", id);
    Ok(Message::new("Person deleted"))
}
