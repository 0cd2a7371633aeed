use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        message: "Painel API is running",
        timestamp: OffsetDateTime::now_utc(),
    })
}
