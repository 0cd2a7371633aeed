use anyhow::Context;
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{app_state::AppState, config::Storage};

mod app_state;
mod config;
mod domain;
mod repositories;
mod router;
mod routes;

const DEFAULT_LOG_FILTER: &str = "painel_api=debug,tower_http=debug,info";

/// `RUST_LOG` overrides the default filter; `PAINEL_LOG_FORMAT=json` switches
/// to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("PAINEL_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = config::read_config().context("Failed to read configuration")?;

    let app_state = match config.storage {
        Storage::Postgres => {
            let connection_pool = PgPoolOptions::new()
                .connect_with(config.database.with_db())
                .await
                .context("Failed to connect to Postgres")?;
            sqlx::migrate!("./migrations")
                .run(&connection_pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!(
                "Connected to database {} at {}:{}",
                config.database.database_name,
                config.database.host,
                config.database.port
            );
            AppState::postgres(connection_pool)
        }
        Storage::Memory => {
            tracing::warn!("Using in-memory storage, records are lost on restart");
            AppState::in_memory()
        }
    };

    let cors_allowed_origin = config
        .application
        .cors_allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("Invalid cors_allowed_origin")?;
    let app = router::create(app_state, cors_allowed_origin);

    let addr = format!("{}:{}", config.application.host, config.application.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
