use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

/// Application error surfaced to HTTP callers. Messages are user-facing; the
/// underlying cause of an `Internal` error is logged where it happens and never
/// returned.
#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Internal(&'static str),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid ({})", e.code),
                })
            })
            .collect();
        messages.sort();

        AppError::Validation(messages.join("; "))
    }
}

pub trait ResultExt<T> {
    /// Logs the error and replaces it with an `Internal` error carrying `message`.
    fn reject(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for color_eyre::Result<T> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e:?}");
            AppError::Internal(message)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(AppError::NotFound("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn reject_hides_the_underlying_error() {
        let result: color_eyre::Result<()> =
            Err(color_eyre::eyre::eyre!("connection reset by peer"));
        let err = result.reject("Failed to fetch progress.").unwrap_err();

        assert_eq!(err, AppError::Internal("Failed to fetch progress."));
        assert_eq!(err.to_string(), "Failed to fetch progress.");
    }
}
