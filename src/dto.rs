// JSON response shapes. Field names follow the web client's camelCase.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{ParagraphSubmission, StudentProgress};
use crate::services::progress::{ProgressDetails, SubmissionResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgressDto {
    pub id: Uuid,
    pub student_id: Uuid,
    pub module_id: Uuid,
    pub completed: bool,
    pub score: Option<i32>,
    pub highest_paragraph_index_reached: Option<i32>,
    pub final_summary: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_spent_minutes: Option<i32>,
    pub teacher_feedback: Option<String>,
    pub teacher_feedback_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentProgress> for StudentProgressDto {
    fn from(row: StudentProgress) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            module_id: row.module_id,
            completed: row.completed,
            score: row.score,
            highest_paragraph_index_reached: row.highest_paragraph_index_reached,
            final_summary: row.final_summary,
            started_at: row.started_at,
            completed_at: row.completed_at,
            time_spent_minutes: row.time_spent_minutes,
            teacher_feedback: row.teacher_feedback,
            teacher_feedback_at: row.teacher_feedback_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphSubmissionDto {
    pub id: Uuid,
    pub student_progress_id: Uuid,
    pub paragraph_index: i32,
    pub paragraph_summary: String,
    pub cumulative_summary: String,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParagraphSubmission> for ParagraphSubmissionDto {
    fn from(row: ParagraphSubmission) -> Self {
        Self {
            id: row.id,
            student_progress_id: row.student_progress_id,
            paragraph_index: row.paragraph_index,
            paragraph_summary: row.paragraph_summary,
            cumulative_summary: row.cumulative_summary,
            submitted_at: row.submitted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionResultDto {
    pub submission: ParagraphSubmissionDto,
    pub progress: StudentProgressDto,
}

impl From<SubmissionResult> for SubmissionResultDto {
    fn from(result: SubmissionResult) -> Self {
        Self {
            submission: result.submission.into(),
            progress: result.progress.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressDetailsDto {
    pub progress: Option<StudentProgressDto>,
    pub submissions: Vec<ParagraphSubmissionDto>,
}

impl From<ProgressDetails> for ProgressDetailsDto {
    fn from(details: ProgressDetails) -> Self {
        Self {
            progress: details.progress.map(Into::into),
            submissions: details.submissions.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn progress_list(rows: Vec<StudentProgress>) -> Vec<StudentProgressDto> {
    rows.into_iter().map(Into::into).collect()
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_details_serialize_with_null_progress() {
        let dto = ProgressDetailsDto::from(ProgressDetails {
            progress: None,
            submissions: Vec::new(),
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "progress": null, "submissions": [] }));
    }

    #[test]
    fn progress_fields_are_camel_case() {
        let now = Utc::now();
        let dto = StudentProgressDto::from(StudentProgress {
            id: Uuid::nil(),
            student_id: Uuid::nil(),
            module_id: Uuid::nil(),
            completed: false,
            score: None,
            highest_paragraph_index_reached: Some(0),
            final_summary: None,
            started_at: now,
            completed_at: None,
            time_spent_minutes: None,
            teacher_feedback: None,
            teacher_feedback_at: None,
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["highestParagraphIndexReached"], 0);
        assert!(json["completedAt"].is_null());
        assert!(json.get("student_id").is_none());
    }
}
