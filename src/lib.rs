pub mod db;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod utils;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::rejections::AppError;
use crate::services::progress::{ProgressOptions, ProgressService};

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub progress: ProgressService,
}

impl AppState {
    pub fn new(db: db::Db, options: ProgressOptions) -> Self {
        Self {
            progress: ProgressService::new(db.clone(), options),
            db,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::health::routes())
        .merge(handlers::progress::routes())
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found")
}
