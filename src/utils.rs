use uuid::Uuid;

use crate::rejections::AppError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parses an opaque identifier from a path segment or body field.
pub fn parse_id(raw: &str, invalid: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(invalid))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_hyphenated_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "bad").unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert_eq!(
            parse_id("12; DROP TABLE", "Invalid module ID format.").unwrap_err(),
            AppError::BadRequest("Invalid module ID format.")
        );
        assert!(parse_id("", "bad").is_err());
    }
}
