use std::fmt::Debug;
use std::future::Future;

use color_eyre::Result;
use uuid::Uuid;

use crate::db::{
    Db, ParagraphSubmission, Profile, ProgressPatch, ReadingModule, RecordOutcome, Role,
    StudentProgress, SubmissionDraft,
};
use crate::rejections::AppError;

// ---------------------------------------------------------------------------
// ProgressRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait ProgressRepository: Send + Sync {
    fn find_profile(
        &self,
        profile_id: Uuid,
    ) -> impl Future<Output = Result<Option<Profile>>> + Send;

    fn managed_student_ids(&self, admin_id: Uuid) -> impl Future<Output = Result<Vec<Uuid>>> + Send;

    fn find_module(
        &self,
        module_id: Uuid,
    ) -> impl Future<Output = Result<Option<ReadingModule>>> + Send;

    fn find_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> impl Future<Output = Result<Option<StudentProgress>>> + Send;

    fn find_progress_by_id(
        &self,
        progress_id: Uuid,
    ) -> impl Future<Output = Result<Option<StudentProgress>>> + Send;

    /// Returns the stored row and whether this call created it.
    fn insert_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> impl Future<Output = Result<(StudentProgress, bool)>> + Send;

    fn list_progress_for_student(
        &self,
        student_id: Uuid,
    ) -> impl Future<Output = Result<Vec<StudentProgress>>> + Send;

    fn list_progress_for_module(
        &self,
        module_id: Uuid,
    ) -> impl Future<Output = Result<Vec<StudentProgress>>> + Send;

    fn list_submissions(
        &self,
        progress_id: Uuid,
    ) -> impl Future<Output = Result<Vec<ParagraphSubmission>>> + Send;

    /// Inserts the submission and advances the progress row atomically.
    fn record_submission(
        &self,
        progress_id: Uuid,
        draft: &SubmissionDraft,
    ) -> impl Future<Output = Result<RecordOutcome>> + Send;

    fn update_progress_grading(
        &self,
        progress_id: Uuid,
        patch: &ProgressPatch,
    ) -> impl Future<Output = Result<Option<StudentProgress>>> + Send;
}

impl ProgressRepository for Db {
    async fn find_profile(&self, profile_id: Uuid) -> Result<Option<Profile>> {
        Db::get_profile(self, profile_id).await
    }

    async fn managed_student_ids(&self, admin_id: Uuid) -> Result<Vec<Uuid>> {
        Db::managed_student_ids(self, admin_id).await
    }

    async fn find_module(&self, module_id: Uuid) -> Result<Option<ReadingModule>> {
        Db::get_reading_module(self, module_id).await
    }

    async fn find_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> Result<Option<StudentProgress>> {
        Db::find_progress(self, student_id, module_id).await
    }

    async fn find_progress_by_id(&self, progress_id: Uuid) -> Result<Option<StudentProgress>> {
        Db::find_progress_by_id(self, progress_id).await
    }

    async fn insert_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> Result<(StudentProgress, bool)> {
        Db::insert_progress(self, student_id, module_id).await
    }

    async fn list_progress_for_student(&self, student_id: Uuid) -> Result<Vec<StudentProgress>> {
        Db::list_progress_for_student(self, student_id).await
    }

    async fn list_progress_for_module(&self, module_id: Uuid) -> Result<Vec<StudentProgress>> {
        Db::list_progress_for_module(self, module_id).await
    }

    async fn list_submissions(&self, progress_id: Uuid) -> Result<Vec<ParagraphSubmission>> {
        Db::list_submissions(self, progress_id).await
    }

    async fn record_submission(
        &self,
        progress_id: Uuid,
        draft: &SubmissionDraft,
    ) -> Result<RecordOutcome> {
        Db::record_submission(self, progress_id, draft).await
    }

    async fn update_progress_grading(
        &self,
        progress_id: Uuid,
        patch: &ProgressPatch,
    ) -> Result<Option<StudentProgress>> {
        Db::update_progress_grading(self, progress_id, patch).await
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const STUDENT_NOT_FOUND: &str = "Student not found";
pub const MODULE_NOT_FOUND: &str = "Reading module not found";
pub const PROGRESS_NOT_STARTED: &str =
    "Progress not started for this module. Cannot submit summary.";
pub const MODULE_ALREADY_COMPLETED: &str =
    "Module already completed. Cannot submit further summaries.";
pub const MODULE_DATA_INVALID: &str = "Module data not found or invalid paragraph count.";
pub const PARAGRAPH_INDEX_NOT_POSITIVE: &str = "Paragraph index must be a positive integer.";
pub const PARAGRAPH_INDEX_OUT_OF_RANGE: &str =
    "Paragraph index exceeds the module's paragraph count.";
pub const PARAGRAPH_OUT_OF_ORDER: &str = "Paragraphs must be submitted in order.";
pub const IDS_REQUIRED: &str = "Student ID and Module ID are required.";
pub const PROGRESS_NOT_FOUND: &str = "Progress record not found.";
pub const EMPTY_UPDATE: &str = "At least one field must be provided for update.";
pub const SCORE_OUT_OF_RANGE: &str = "Score must be between 0 and 100.";
pub const NOT_MANAGED: &str = "You are not authorized to manage this student.";

const START_FAILED: &str = "Failed to start progress.";
const SUBMIT_FAILED: &str = "Failed to submit paragraph summary.";
const DETAILS_FAILED: &str = "Failed to get student progress details.";
const FETCH_FAILED: &str = "Failed to fetch progress.";
const UPDATE_FAILED: &str = "Failed to update progress.";

/// Logs a datastore failure together with the operation input, then hides it
/// behind a fixed message.
fn internal<C: Debug>(
    message: &'static str,
    context: C,
) -> impl FnOnce(color_eyre::Report) -> AppError {
    move |e| {
        tracing::error!(?context, error = ?e, "{message}");
        AppError::Internal(message)
    }
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressOptions {
    /// Only accept the paragraph right after the highest one reached.
    pub strict_sequencing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphSummary {
    pub paragraph_index: i32,
    pub paragraph_summary: String,
    pub cumulative_summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartedProgress {
    pub progress: StudentProgress,
    /// False when the row already existed.
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub submission: ParagraphSubmission,
    pub progress: StudentProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDetails {
    pub progress: Option<StudentProgress>,
    pub submissions: Vec<ParagraphSubmission>,
}

// ---------------------------------------------------------------------------
// ProgressService
// ---------------------------------------------------------------------------

pub struct ProgressService<R: ProgressRepository = Db> {
    repo: R,
    options: ProgressOptions,
}

impl<R: ProgressRepository + Clone> Clone for ProgressService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            options: self.options,
        }
    }
}

impl<R: ProgressRepository> ProgressService<R> {
    pub fn new(repo: R, options: ProgressOptions) -> Self {
        Self { repo, options }
    }

    /// Fetches the progress row for the pair, creating it on first start.
    /// An existing row is returned as is, without re-checking the student or module.
    pub async fn start_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> Result<StartedProgress, AppError> {
        let context = (student_id, module_id);

        if let Some(progress) = self
            .repo
            .find_progress(student_id, module_id)
            .await
            .map_err(internal(START_FAILED, context))?
        {
            return Ok(StartedProgress {
                progress,
                created: false,
            });
        }

        self.repo
            .find_profile(student_id)
            .await
            .map_err(internal(START_FAILED, context))?
            .ok_or(AppError::NotFound(STUDENT_NOT_FOUND))?;

        self.repo
            .find_module(module_id)
            .await
            .map_err(internal(START_FAILED, context))?
            .ok_or(AppError::NotFound(MODULE_NOT_FOUND))?;

        let (progress, created) = self
            .repo
            .insert_progress(student_id, module_id)
            .await
            .map_err(internal(START_FAILED, context))?;

        Ok(StartedProgress { progress, created })
    }

    /// Records one paragraph summary and advances the progress row, completing
    /// it when the paragraph is the module's last.
    pub async fn submit_paragraph_summary(
        &self,
        student_id: Uuid,
        module_id: Uuid,
        summary: ParagraphSummary,
    ) -> Result<SubmissionResult, AppError> {
        let context = (student_id, module_id, &summary);

        if summary.paragraph_index < 1 {
            return Err(AppError::BadRequest(PARAGRAPH_INDEX_NOT_POSITIVE));
        }

        let progress = self
            .repo
            .find_progress(student_id, module_id)
            .await
            .map_err(internal(SUBMIT_FAILED, context))?
            .ok_or(AppError::NotFound(PROGRESS_NOT_STARTED))?;

        if progress.completed {
            tracing::warn!(progress_id = %progress.id, "submission after completion rejected");
            return Err(AppError::BadRequest(MODULE_ALREADY_COMPLETED));
        }

        let paragraph_count = self
            .repo
            .find_module(module_id)
            .await
            .map_err(internal(SUBMIT_FAILED, context))?
            .map(|module| module.paragraph_count)
            .filter(|count| *count > 0)
            .ok_or(AppError::NotFound(MODULE_DATA_INVALID))?;

        if summary.paragraph_index > paragraph_count {
            return Err(AppError::BadRequest(PARAGRAPH_INDEX_OUT_OF_RANGE));
        }

        if self.options.strict_sequencing {
            let expected = progress.highest_paragraph_index_reached.unwrap_or(0) + 1;
            if summary.paragraph_index != expected {
                tracing::warn!(
                    progress_id = %progress.id,
                    expected,
                    got = summary.paragraph_index,
                    "out-of-order submission rejected"
                );
                return Err(AppError::BadRequest(PARAGRAPH_OUT_OF_ORDER));
            }
        }

        let draft = SubmissionDraft {
            paragraph_index: summary.paragraph_index,
            completes_module: summary.paragraph_index == paragraph_count,
            paragraph_summary: summary.paragraph_summary.clone(),
            cumulative_summary: summary.cumulative_summary.clone(),
            in_order_only: self.options.strict_sequencing,
        };

        match self
            .repo
            .record_submission(progress.id, &draft)
            .await
            .map_err(internal(SUBMIT_FAILED, context))?
        {
            RecordOutcome::Recorded {
                submission,
                progress,
            } => Ok(SubmissionResult {
                submission,
                progress,
            }),
            RecordOutcome::AlreadyCompleted => {
                tracing::warn!(progress_id = %progress.id, "module completed by a concurrent submission");
                Err(AppError::BadRequest(MODULE_ALREADY_COMPLETED))
            }
            RecordOutcome::OutOfOrder { expected } => {
                tracing::warn!(
                    progress_id = %progress.id,
                    expected,
                    got = summary.paragraph_index,
                    "paragraph taken by a concurrent submission"
                );
                Err(AppError::BadRequest(PARAGRAPH_OUT_OF_ORDER))
            }
        }
    }

    pub async fn get_student_progress_details(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> Result<ProgressDetails, AppError> {
        if student_id.is_nil() || module_id.is_nil() {
            return Err(AppError::BadRequest(IDS_REQUIRED));
        }
        let context = (student_id, module_id);

        let Some(progress) = self
            .repo
            .find_progress(student_id, module_id)
            .await
            .map_err(internal(DETAILS_FAILED, context))?
        else {
            return Ok(ProgressDetails {
                progress: None,
                submissions: Vec::new(),
            });
        };

        let submissions = self
            .repo
            .list_submissions(progress.id)
            .await
            .map_err(internal(DETAILS_FAILED, context))?;

        Ok(ProgressDetails {
            progress: Some(progress),
            submissions,
        })
    }

    pub async fn get_student_module_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> Result<Option<StudentProgress>, AppError> {
        self.repo
            .find_progress(student_id, module_id)
            .await
            .map_err(internal(FETCH_FAILED, (student_id, module_id)))
    }

    pub async fn get_progress_by_id(
        &self,
        progress_id: Uuid,
    ) -> Result<Option<StudentProgress>, AppError> {
        self.repo
            .find_progress_by_id(progress_id)
            .await
            .map_err(internal(FETCH_FAILED, progress_id))
    }

    pub async fn get_all_student_progress(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentProgress>, AppError> {
        self.repo
            .find_profile(student_id)
            .await
            .map_err(internal(FETCH_FAILED, student_id))?
            .filter(|profile| profile.role == Role::Student)
            .ok_or(AppError::NotFound(STUDENT_NOT_FOUND))?;

        self.repo
            .list_progress_for_student(student_id)
            .await
            .map_err(internal(FETCH_FAILED, student_id))
    }

    pub async fn get_all_module_progress(
        &self,
        module_id: Uuid,
    ) -> Result<Vec<StudentProgress>, AppError> {
        self.repo
            .find_module(module_id)
            .await
            .map_err(internal(FETCH_FAILED, module_id))?
            .ok_or(AppError::NotFound(MODULE_NOT_FOUND))?;

        self.repo
            .list_progress_for_module(module_id)
            .await
            .map_err(internal(FETCH_FAILED, module_id))
    }

    /// Module progress restricted to the students the admin manages.
    pub async fn get_module_progress_for_admin(
        &self,
        admin: &Profile,
        module_id: Uuid,
    ) -> Result<Vec<StudentProgress>, AppError> {
        let rows = self.get_all_module_progress(module_id).await?;

        if admin.role == Role::SuperAdmin {
            return Ok(rows);
        }

        let managed = self
            .repo
            .managed_student_ids(admin.id)
            .await
            .map_err(internal(FETCH_FAILED, (admin.id, module_id)))?;

        Ok(rows
            .into_iter()
            .filter(|row| managed.contains(&row.student_id))
            .collect())
    }

    /// Resolves a student the admin is allowed to manage.
    pub async fn managed_student(
        &self,
        admin: &Profile,
        student_id: Uuid,
    ) -> Result<Profile, AppError> {
        let student = self
            .repo
            .find_profile(student_id)
            .await
            .map_err(internal(FETCH_FAILED, (admin.id, student_id)))?
            .filter(|profile| profile.role == Role::Student)
            .ok_or(AppError::NotFound(STUDENT_NOT_FOUND))?;

        if !admin.manages(&student) {
            tracing::warn!(admin_id = %admin.id, %student_id, "admin denied access to student");
            return Err(AppError::Forbidden(NOT_MANAGED));
        }

        Ok(student)
    }

    /// Overwrites score, feedback or the completion flag on a progress row.
    pub async fn admin_update_progress(
        &self,
        admin: &Profile,
        progress_id: Uuid,
        patch: ProgressPatch,
    ) -> Result<StudentProgress, AppError> {
        if patch.is_empty() {
            return Err(AppError::BadRequest(EMPTY_UPDATE));
        }
        if patch.score.is_some_and(|score| !(0..=100).contains(&score)) {
            return Err(AppError::BadRequest(SCORE_OUT_OF_RANGE));
        }
        let context = (admin.id, progress_id, &patch);

        let progress = self
            .repo
            .find_progress_by_id(progress_id)
            .await
            .map_err(internal(UPDATE_FAILED, context))?
            .ok_or(AppError::NotFound(PROGRESS_NOT_FOUND))?;

        self.managed_student(admin, progress.student_id).await?;

        self.repo
            .update_progress_grading(progress_id, &patch)
            .await
            .map_err(internal(UPDATE_FAILED, context))?
            .ok_or(AppError::NotFound(PROGRESS_NOT_FOUND))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
