use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::{
    db::{Profile, Role},
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

/// Session token from `Authorization: Bearer <token>`, falling back to the
/// session cookie.
fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(names::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
    })
}

/// Guard extractor that resolves the caller's session token to a profile.
pub struct AuthGuard(pub Profile);

impl FromRequestParts<AppState> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(AppError::Unauthorized)?;

        let profile = state
            .db
            .get_profile_by_session(&token)
            .await
            .reject("Could not resolve session.")?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthGuard(profile))
    }
}

/// A caller with the student role.
pub struct StudentGuard(pub Profile);

impl FromRequestParts<AppState> for StudentGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthGuard(profile) = AuthGuard::from_request_parts(parts, state).await?;

        if profile.role != Role::Student {
            return Err(AppError::Forbidden("Student access required."));
        }

        Ok(StudentGuard(profile))
    }
}

/// A caller with the admin or super-admin role.
pub struct AdminGuard(pub Profile);

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthGuard(profile) = AuthGuard::from_request_parts(parts, state).await?;

        if !profile.role.is_admin() {
            return Err(AppError::Forbidden("Admin access required."));
        }

        Ok(AdminGuard(profile))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        let (parts, _) = builder.body(()).unwrap_or_default().into_parts();
        parts
    }

    #[test]
    fn bearer_token_wins_over_cookie() {
        let parts = parts(
            Request::builder()
                .header(header::AUTHORIZATION, "Bearer abc")
                .header(header::COOKIE, format!("{}=def", names::SESSION_COOKIE_NAME)),
        );
        assert_eq!(session_token(&parts).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_token_is_used_without_bearer() {
        let parts = parts(
            Request::builder()
                .header(header::COOKIE, format!("{}=def", names::SESSION_COOKIE_NAME)),
        );
        assert_eq!(session_token(&parts).as_deref(), Some("def"));
    }

    #[test]
    fn missing_or_blank_credentials_yield_none() {
        assert!(session_token(&parts(Request::builder())).is_none());
        let blank = parts(Request::builder().header(header::AUTHORIZATION, "Bearer  "));
        assert!(session_token(&blank).is_none());
        let basic = parts(Request::builder().header(header::AUTHORIZATION, "Basic Zm9v"));
        assert!(session_token(&basic).is_none());
    }
}
