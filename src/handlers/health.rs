use axum::{routing::get, Json, Router};

use crate::{dto::HealthDto, names, utils, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::HEALTH_URL, get(health))
}

async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        version: utils::VERSION,
    })
}
