use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use super::{INVALID_MODULE_ID, INVALID_PROGRESS_ID, INVALID_STUDENT_ID};
use crate::{
    dto::{self, ProgressDetailsDto, StudentProgressDto},
    extractors::AdminGuard,
    models::AdminUpdateProgressInput,
    rejections::AppError,
    utils, AppState,
};

pub(super) async fn update_progress(
    AdminGuard(admin): AdminGuard,
    State(state): State<AppState>,
    Path(progress_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<AdminUpdateProgressInput>, AppError>,
) -> Result<Json<StudentProgressDto>, AppError> {
    let progress_id = utils::parse_id(&progress_id, INVALID_PROGRESS_ID)?;
    body.validate()?;

    let progress = state
        .progress
        .admin_update_progress(&admin, progress_id, body.into())
        .await?;

    Ok(Json(progress.into()))
}

pub(super) async fn module_progress(
    AdminGuard(admin): AdminGuard,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<Json<Vec<StudentProgressDto>>, AppError> {
    let module_id = utils::parse_id(&module_id, INVALID_MODULE_ID)?;

    let rows = state
        .progress
        .get_module_progress_for_admin(&admin, module_id)
        .await?;

    Ok(Json(dto::progress_list(rows)))
}

pub(super) async fn student_progress(
    AdminGuard(admin): AdminGuard,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<StudentProgressDto>>, AppError> {
    let student_id = utils::parse_id(&student_id, INVALID_STUDENT_ID)?;

    let student = state.progress.managed_student(&admin, student_id).await?;
    let rows = state.progress.get_all_student_progress(student.id).await?;

    Ok(Json(dto::progress_list(rows)))
}

pub(super) async fn student_module_details(
    AdminGuard(admin): AdminGuard,
    State(state): State<AppState>,
    Path((student_id, module_id)): Path<(String, String)>,
) -> Result<Json<ProgressDetailsDto>, AppError> {
    let student_id = utils::parse_id(&student_id, INVALID_STUDENT_ID)?;
    let module_id = utils::parse_id(&module_id, INVALID_MODULE_ID)?;

    let student = state.progress.managed_student(&admin, student_id).await?;
    let details = state
        .progress
        .get_student_progress_details(student.id, module_id)
        .await?;

    Ok(Json(details.into()))
}
