use color_eyre::{eyre::OptionExt, Result};
use uuid::Uuid;

use super::models::{
    ParagraphSubmission, ProgressPatch, RecordOutcome, StudentProgress, SubmissionDraft,
};
use super::Db;

pub(super) const PROGRESS_COLUMNS: &str = "id, student_id, module_id, completed, score, highest_paragraph_index_reached, final_summary, started_at, completed_at, time_spent_minutes, teacher_feedback, teacher_feedback_at, created_at, updated_at";

pub(super) const SUBMISSION_COLUMNS: &str = "id, student_progress_id, paragraph_index, paragraph_summary, cumulative_summary, submitted_at, created_at, updated_at";

impl Db {
    pub async fn find_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> Result<Option<StudentProgress>> {
        let progress = sqlx::query_as::<_, StudentProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM student_progress WHERE student_id = $1 AND module_id = $2"
        ))
        .bind(student_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(progress)
    }

    pub async fn find_progress_by_id(&self, progress_id: Uuid) -> Result<Option<StudentProgress>> {
        let progress = sqlx::query_as::<_, StudentProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM student_progress WHERE id = $1"
        ))
        .bind(progress_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(progress)
    }

    /// Inserts a fresh progress row for the pair unless one exists, then returns
    /// the stored row. Returns `(row, created)`.
    pub async fn insert_progress(
        &self,
        student_id: Uuid,
        module_id: Uuid,
    ) -> Result<(StudentProgress, bool)> {
        let inserted = sqlx::query_as::<_, StudentProgress>(&format!(
            r#"
            INSERT INTO student_progress (student_id, module_id, highest_paragraph_index_reached, completed, started_at)
            VALUES ($1, $2, 0, FALSE, NOW())
            ON CONFLICT (student_id, module_id) DO NOTHING
            RETURNING {PROGRESS_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(progress) = inserted {
            tracing::info!(progress_id = %progress.id, %student_id, %module_id, "progress started");
            return Ok((progress, true));
        }

        // Lost a race with another start for the same pair
        let existing = self
            .find_progress(student_id, module_id)
            .await?
            .ok_or_eyre("progress row missing after conflicting insert")?;

        Ok((existing, false))
    }

    pub async fn list_progress_for_student(&self, student_id: Uuid) -> Result<Vec<StudentProgress>> {
        let rows = sqlx::query_as::<_, StudentProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM student_progress WHERE student_id = $1 ORDER BY started_at, id"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_progress_for_module(&self, module_id: Uuid) -> Result<Vec<StudentProgress>> {
        let rows = sqlx::query_as::<_, StudentProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM student_progress WHERE module_id = $1 ORDER BY started_at, id"
        ))
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Writes one paragraph submission and advances the progress row in a single
    /// transaction. The progress row is locked first so submissions for the same
    /// pair are serialized.
    pub async fn record_submission(
        &self,
        progress_id: Uuid,
        draft: &SubmissionDraft,
    ) -> Result<RecordOutcome> {
        let mut tx = self.pool.begin().await?;

        let (completed, highest): (bool, Option<i32>) = sqlx::query_as(
            "SELECT completed, highest_paragraph_index_reached FROM student_progress WHERE id = $1 FOR UPDATE",
        )
        .bind(progress_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_eyre("progress row not found")?;

        if completed {
            tx.rollback().await?;
            return Ok(RecordOutcome::AlreadyCompleted);
        }

        let expected = highest.unwrap_or(0) + 1;
        if draft.in_order_only && draft.paragraph_index != expected {
            tx.rollback().await?;
            return Ok(RecordOutcome::OutOfOrder { expected });
        }

        let submission = sqlx::query_as::<_, ParagraphSubmission>(&format!(
            r#"
            INSERT INTO paragraph_submissions (student_progress_id, paragraph_index, paragraph_summary, cumulative_summary, submitted_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(progress_id)
        .bind(draft.paragraph_index)
        .bind(&draft.paragraph_summary)
        .bind(&draft.cumulative_summary)
        .fetch_one(&mut *tx)
        .await?;

        let progress = sqlx::query_as::<_, StudentProgress>(&format!(
            r#"
            UPDATE student_progress SET
                highest_paragraph_index_reached = GREATEST(COALESCE(highest_paragraph_index_reached, 0), $2),
                updated_at = NOW(),
                completed = completed OR $3,
                completed_at = CASE WHEN $3 THEN NOW() ELSE completed_at END,
                final_summary = CASE WHEN $3 THEN $4 ELSE final_summary END,
                time_spent_minutes = CASE
                    WHEN $3 THEN CEIL(EXTRACT(EPOCH FROM (NOW() - started_at)) / 60)::INT
                    ELSE time_spent_minutes
                END
            WHERE id = $1
            RETURNING {PROGRESS_COLUMNS}
            "#
        ))
        .bind(progress_id)
        .bind(draft.paragraph_index)
        .bind(draft.completes_module)
        .bind(&draft.cumulative_summary)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            %progress_id,
            paragraph_index = draft.paragraph_index,
            completed = progress.completed,
            "paragraph submission recorded"
        );

        Ok(RecordOutcome::Recorded {
            submission,
            progress,
        })
    }

    /// Applies an admin patch. Marking a row completed also moves it to the last
    /// paragraph of its module and fills in the time spent; reopening it clears
    /// every completion field. Returns `None` if the row does not exist.
    pub async fn update_progress_grading(
        &self,
        progress_id: Uuid,
        patch: &ProgressPatch,
    ) -> Result<Option<StudentProgress>> {
        let progress = sqlx::query_as::<_, StudentProgress>(&format!(
            r#"
            UPDATE student_progress SET
                score = COALESCE($2, score),
                teacher_feedback = COALESCE($3, teacher_feedback),
                teacher_feedback_at = CASE WHEN $3::TEXT IS NULL THEN teacher_feedback_at ELSE NOW() END,
                completed = COALESCE($4, completed),
                completed_at = CASE
                    WHEN $4::BOOLEAN IS NULL THEN completed_at
                    WHEN $4 THEN COALESCE(completed_at, NOW())
                    ELSE NULL
                END,
                time_spent_minutes = CASE
                    WHEN $4::BOOLEAN IS NULL THEN time_spent_minutes
                    WHEN $4 THEN COALESCE(
                        time_spent_minutes,
                        CEIL(EXTRACT(EPOCH FROM (NOW() - started_at)) / 60)::INT
                    )
                    ELSE NULL
                END,
                final_summary = CASE WHEN $4::BOOLEAN IS FALSE THEN NULL ELSE final_summary END,
                highest_paragraph_index_reached = CASE
                    WHEN $4::BOOLEAN IS TRUE THEN (
                        SELECT m.paragraph_count FROM reading_modules m WHERE m.id = student_progress.module_id
                    )
                    ELSE highest_paragraph_index_reached
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROGRESS_COLUMNS}
            "#
        ))
        .bind(progress_id)
        .bind(patch.score)
        .bind(patch.teacher_feedback.as_deref())
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(progress) = &progress {
            tracing::info!(
                %progress_id,
                score = ?progress.score,
                completed = progress.completed,
                "progress graded"
            );
        }

        Ok(progress)
    }
}
