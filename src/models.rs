use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::db::ProgressPatch;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProgressInput {
    pub module_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSummaryInput {
    pub module_id: String,
    #[validate(range(min = 1, message = "Paragraph index must be a positive integer."))]
    pub paragraph_index: i32,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Paragraph summary must be between 1 and 1000 characters."
    ))]
    pub paragraph_summary: String,
    #[validate(length(
        min = 1,
        max = 10000,
        message = "Cumulative summary must be between 1 and 10000 characters."
    ))]
    pub cumulative_summary: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "at_least_one_field", skip_on_field_errors = false))]
pub struct AdminUpdateProgressInput {
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100."))]
    pub score: Option<i32>,
    #[validate(length(
        max = 2000,
        message = "Teacher feedback must be at most 2000 characters."
    ))]
    pub teacher_feedback: Option<String>,
    pub completed: Option<bool>,
}

fn at_least_one_field(input: &AdminUpdateProgressInput) -> Result<(), ValidationError> {
    if input.score.is_none() && input.teacher_feedback.is_none() && input.completed.is_none() {
        let mut error = ValidationError::new("empty_update");
        error.message = Some("At least one field must be provided for update.".into());
        return Err(error);
    }
    Ok(())
}

impl From<AdminUpdateProgressInput> for ProgressPatch {
    fn from(input: AdminUpdateProgressInput) -> Self {
        ProgressPatch {
            score: input.score,
            teacher_feedback: input.teacher_feedback,
            completed: input.completed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submit(index: i32, paragraph: &str, cumulative: &str) -> SubmitSummaryInput {
        SubmitSummaryInput {
            module_id: "m".to_string(),
            paragraph_index: index,
            paragraph_summary: paragraph.to_string(),
            cumulative_summary: cumulative.to_string(),
        }
    }

    #[test]
    fn submit_accepts_limits() {
        let input = submit(1, &"a".repeat(1000), &"b".repeat(10000));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn submit_rejects_non_positive_index() {
        assert!(submit(0, "a", "b").validate().is_err());
        assert!(submit(-3, "a", "b").validate().is_err());
    }

    #[test]
    fn submit_rejects_empty_and_oversized_summaries() {
        assert!(submit(1, "", "b").validate().is_err());
        assert!(submit(1, "a", "").validate().is_err());
        assert!(submit(1, &"a".repeat(1001), "b").validate().is_err());
        assert!(submit(1, "a", &"b".repeat(10001)).validate().is_err());
    }

    #[test]
    fn summary_length_counts_characters_not_bytes() {
        // 1000 two-byte characters
        let input = submit(1, &"é".repeat(1000), "b");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn admin_update_requires_a_field() {
        let err = AdminUpdateProgressInput::default().validate().unwrap_err();
        let message = crate::rejections::AppError::from(err).to_string();
        assert_eq!(message, "At least one field must be provided for update.");
    }

    #[test]
    fn admin_update_checks_score_and_feedback() {
        let input = AdminUpdateProgressInput {
            score: Some(101),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = AdminUpdateProgressInput {
            teacher_feedback: Some("x".repeat(2001)),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = AdminUpdateProgressInput {
            score: Some(0),
            teacher_feedback: Some(String::new()),
            completed: Some(true),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn admin_update_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<AdminUpdateProgressInput>(r#"{"grade": 3}"#);
        assert!(parsed.is_err());
    }
}
