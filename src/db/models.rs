// Database model structs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_role")]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[sqlx(rename = "admin")]
    Admin,
    #[sqlx(rename = "student")]
    Student,
    #[sqlx(rename = "super-admin")]
    SuperAdmin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub role: Role,
    pub admin_id: Option<Uuid>,
    pub full_name: String,
    pub age: Option<i32>,
    pub reading_level: Option<i32>,
}

impl Profile {
    /// Whether this profile may read or grade the given student's work.
    pub fn manages(&self, student: &Profile) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::Admin => student.admin_id == Some(self.id),
            Role::Student => false,
        }
    }
}

pub struct NewProfile<'a> {
    pub role: Role,
    pub admin_id: Option<Uuid>,
    pub full_name: &'a str,
    pub pin: Option<&'a str>,
    pub age: Option<i32>,
    pub reading_level: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "module_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Curated,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub index: i32,
    pub text: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReadingModule {
    pub id: Uuid,
    pub title: String,
    pub structured_content: Json<Vec<Paragraph>>,
    pub paragraph_count: i32,
    pub level: i32,
    pub module_type: ModuleType,
    pub genre: Option<String>,
    pub language: String,
    pub admin_id: Option<Uuid>,
    pub is_active: bool,
}

pub struct NewReadingModule<'a> {
    pub title: &'a str,
    /// Paragraph texts in reading order; indices are assigned from 1.
    pub paragraphs: &'a [&'a str],
    pub level: i32,
    pub module_type: ModuleType,
    pub genre: Option<&'a str>,
    pub language: &'a str,
    pub admin_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StudentProgress {
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

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ParagraphSubmission {
    pub id: Uuid,
    pub student_progress_id: Uuid,
    pub paragraph_index: i32,
    pub paragraph_summary: String,
    pub cumulative_summary: String,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A paragraph summary ready to be written, with the completion decision already made.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDraft {
    pub paragraph_index: i32,
    pub paragraph_summary: String,
    pub cumulative_summary: String,
    pub completes_module: bool,
    /// When set, the write is refused unless this paragraph directly follows
    /// the highest one reached.
    pub in_order_only: bool,
}

pub enum RecordOutcome {
    Recorded {
        submission: ParagraphSubmission,
        progress: StudentProgress,
    },
    /// The progress row was completed by a concurrent submission.
    AlreadyCompleted,
    /// Another submission advanced the row first, so this paragraph is no
    /// longer the next one.
    OutOfOrder { expected: i32 },
}

/// Fields an admin may overwrite on a progress row. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressPatch {
    pub score: Option<i32>,
    pub teacher_feedback: Option<String>,
    pub completed: Option<bool>,
}

impl ProgressPatch {
    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.teacher_feedback.is_none() && self.completed.is_none()
    }
}
