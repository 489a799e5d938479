mod admin;
mod student;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{names, AppState};

const INVALID_MODULE_ID: &str = "Invalid module ID format.";
const INVALID_STUDENT_ID: &str = "Invalid student ID format.";
const INVALID_PROGRESS_ID: &str = "Invalid progress ID format.";

pub fn routes() -> Router<AppState> {
    let progress = Router::new()
        .route(names::START_PROGRESS_URL, post(student::start_progress))
        .route(names::SUBMIT_SUMMARY_URL, post(student::submit_summary))
        .route(names::DETAILS_URL, get(student::details))
        .route(names::MY_PROGRESS_URL, get(student::my_progress))
        .route(names::ADMIN_UPDATE_URL, patch(admin::update_progress))
        .route(names::ADMIN_MODULE_URL, get(admin::module_progress))
        .route(names::ADMIN_STUDENT_URL, get(admin::student_progress))
        .route(
            names::ADMIN_STUDENT_MODULE_URL,
            get(admin::student_module_details),
        );

    Router::new().nest(names::PROGRESS_PREFIX, progress)
}
