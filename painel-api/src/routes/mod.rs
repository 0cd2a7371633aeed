pub(crate) mod activities;
pub(crate) mod error;
pub(crate) mod health;
pub(crate) mod people;
pub(crate) mod projects;
pub(crate) mod rollups;
pub(crate) mod subtasks;

use axum::Json;
use serde::Serialize;

pub(crate) use error::ApiError;

#[derive(Debug, Serialize)]
pub(crate) struct Message {
    message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// 400 naming the first blank field among `fields`.
pub(crate) fn require(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(ApiError::bad_request(format!("{} is required", name))),
        None => Ok(()),
    }
}

pub(crate) async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
