//! Authentication extractor.
//!
//! Resolves the caller from the `Authorization` header: verifies the access
//! token and loads the full user record. A missing or invalid token rejects
//! the request with 403.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::db::UserRepository;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires an authenticated caller.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct CurrentUser(pub User);

/// Error returned when authentication fails.
pub enum AuthRejection {
    /// No `Authorization` header on the request.
    MissingHeader,
    /// The token is malformed, expired, or references a missing user.
    InvalidToken,
    /// Lookup of the token's user failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingHeader => (
                StatusCode::FORBIDDEN,
                "You must provide an `Authorization` header",
            )
                .into_response(),
            Self::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token").into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthRejection::MissingHeader)?;

        let token = strip_bearer(header);

        let claims = state
            .tokens()
            .verify(token)
            .map_err(|_| AuthRejection::InvalidToken)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(claims.user_id)
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::InvalidToken)?;

        Ok(Self(user))
    }
}

/// Strip an optional case-insensitive `Bearer ` scheme prefix.
fn strip_bearer(header: &str) -> &str {
    let trimmed = header.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed
            .get(7..)
            .map_or(trimmed, str::trim_start),
        _ => trimmed,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bearer_variants() {
        assert_eq!(strip_bearer("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(strip_bearer("bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(strip_bearer("abc.def.ghi"), "abc.def.ghi");
        assert_eq!(strip_bearer("  Bearer   abc  ").trim_end(), "abc");
    }
}
