use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use super::INVALID_MODULE_ID;
use crate::{
    dto::{self, ProgressDetailsDto, StudentProgressDto, SubmissionResultDto},
    extractors::StudentGuard,
    models::{StartProgressInput, SubmitSummaryInput},
    rejections::AppError,
    services::progress::ParagraphSummary,
    utils, AppState,
};

pub(super) async fn start_progress(
    StudentGuard(student): StudentGuard,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<StartProgressInput>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let module_id = utils::parse_id(&body.module_id, INVALID_MODULE_ID)?;

    let started = state.progress.start_progress(student.id, module_id).await?;

    let status = if started.created {
        tracing::info!(student_id = %student.id, %module_id, "student started module");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(StudentProgressDto::from(started.progress))))
}

pub(super) async fn submit_summary(
    StudentGuard(student): StudentGuard,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SubmitSummaryInput>, AppError>,
) -> Result<Json<SubmissionResultDto>, AppError> {
    body.validate()?;
    let module_id = utils::parse_id(&body.module_id, INVALID_MODULE_ID)?;

    let result = state
        .progress
        .submit_paragraph_summary(
            student.id,
            module_id,
            ParagraphSummary {
                paragraph_index: body.paragraph_index,
                paragraph_summary: body.paragraph_summary,
                cumulative_summary: body.cumulative_summary,
            },
        )
        .await?;

    Ok(Json(result.into()))
}

pub(super) async fn details(
    StudentGuard(student): StudentGuard,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<Json<ProgressDetailsDto>, AppError> {
    let module_id = utils::parse_id(&module_id, INVALID_MODULE_ID)?;

    let details = state
        .progress
        .get_student_progress_details(student.id, module_id)
        .await?;

    Ok(Json(details.into()))
}

pub(super) async fn my_progress(
    StudentGuard(student): StudentGuard,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentProgressDto>>, AppError> {
    let rows = state.progress.get_all_student_progress(student.id).await?;

    Ok(Json(dto::progress_list(rows)))
}
