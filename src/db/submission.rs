use color_eyre::Result;
use uuid::Uuid;

use super::models::ParagraphSubmission;
use super::progress::SUBMISSION_COLUMNS;
use super::Db;

impl Db {
    /// All submissions of a progress row in reading order.
    pub async fn list_submissions(&self, progress_id: Uuid) -> Result<Vec<ParagraphSubmission>> {
        let submissions = sqlx::query_as::<_, ParagraphSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM paragraph_submissions WHERE student_progress_id = $1 ORDER BY paragraph_index, submitted_at, id"
        ))
        .bind(progress_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    pub async fn submissions_count(&self, progress_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM paragraph_submissions WHERE student_progress_id = $1",
        )
        .bind(progress_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
