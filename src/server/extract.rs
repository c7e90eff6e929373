//! Request extractors.
//!
//! Identity is verified by the hosted auth provider in front of this
//! service; requests arrive with the user's UUID in `x-user-id`.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use super::error::ApiError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the reminder session id.
pub const SESSION_ID_HEADER: &str = "x-session-id";
/// Longest accepted session id.
pub const MAX_SESSION_ID_LENGTH: usize = 128;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    id: Uuid,
    key: String,
}

impl AuthUser {
    /// Wrap a user id.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            key: id.hyphenated().to_string(),
        }
    }

    /// The user's UUID.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.id
    }

    /// Canonical (lowercase, hyphenated) id used as the storage key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.key
    }

    fn from_headers(headers: &HeaderMap) -> Result<Option<Self>, ApiError> {
        let Some(raw) = headers.get(USER_ID_HEADER) else {
            return Ok(None);
        };
        let raw = raw
            .to_str()
            .map_err(|_| ApiError::unauthorized("x-user-id is not valid text"))?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| ApiError::unauthorized("x-user-id must be a UUID"))?;
        Ok(Some(Self::new(id)))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)?
            .ok_or_else(|| ApiError::unauthorized("missing x-user-id header"))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

/// Reminder cache key for the caller: `<user id>:<session id>`.
///
/// The session id comes from `x-session-id` and falls back to the user id.
/// Keys always start with the authenticated user, so one user's session id
/// never reaches another user's cached reminder.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for a session id that is not text or
/// is longer than [`MAX_SESSION_ID_LENGTH`].
pub fn reminder_cache_key(headers: &HeaderMap, user: &AuthUser) -> Result<String, ApiError> {
    let session = match headers.get(SESSION_ID_HEADER) {
        Some(raw) => raw
            .to_str()
            .map_err(|_| ApiError::bad_request("x-session-id is not valid text"))?
            .trim(),
        None => "",
    };
    if session.len() > MAX_SESSION_ID_LENGTH {
        return Err(ApiError::bad_request(format!(
            "x-session-id longer than {MAX_SESSION_ID_LENGTH} characters"
        )));
    }
    let session = if session.is_empty() { user.id() } else { session };
    Ok(format!("{}:{session}", user.id()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request, StatusCode};
    use pretty_assertions::assert_eq;

    const USER: &str = "3f6c2a4e-8b1d-4c5e-9f7a-2b3c4d5e6f70";

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_auth_user_parsed() {
        let mut parts = parts(&[(USER_ID_HEADER, " 3F6C2A4E-8B1D-4C5E-9F7A-2B3C4D5E6F70 ")]);
        let user = <AuthUser as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.id(), USER);
    }

    #[tokio::test]
    async fn test_auth_user_missing() {
        let mut parts = parts(&[]);
        let err = <AuthUser as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_user_not_uuid() {
        let mut parts = parts(&[(USER_ID_HEADER, "alice")]);
        let err = <AuthUser as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_auth_user() {
        let mut empty = parts(&[]);
        let none = <AuthUser as OptionalFromRequestParts<()>>::from_request_parts(&mut empty, &())
            .await
            .unwrap();
        assert!(none.is_none());

        let mut bad = parts(&[(USER_ID_HEADER, "nope")]);
        assert!(
            <AuthUser as OptionalFromRequestParts<()>>::from_request_parts(&mut bad, &())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_cache_key_defaults_to_user_session() {
        let user = AuthUser::new(Uuid::parse_str(USER).unwrap());
        let mut headers = HeaderMap::new();
        assert_eq!(
            reminder_cache_key(&headers, &user).unwrap(),
            format!("{USER}:{USER}")
        );

        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static("phone-1"));
        assert_eq!(
            reminder_cache_key(&headers, &user).unwrap(),
            format!("{USER}:phone-1")
        );

        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(
            reminder_cache_key(&headers, &user).unwrap(),
            format!("{USER}:{USER}")
        );
    }

    #[test]
    fn test_cache_key_scoped_to_user() {
        let owner = AuthUser::new(Uuid::parse_str(USER).unwrap());
        let other = AuthUser::new(Uuid::nil());
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static(USER));

        let owner_key = reminder_cache_key(&HeaderMap::new(), &owner).unwrap();
        let other_key = reminder_cache_key(&headers, &other).unwrap();
        assert_ne!(owner_key, other_key);
        assert!(other_key.starts_with(other.id()));
    }

    #[test]
    fn test_session_id_too_long() {
        let user = AuthUser::new(Uuid::nil());
        let mut headers = HeaderMap::new();
        let long = "s".repeat(MAX_SESSION_ID_LENGTH + 1);
        headers.insert(SESSION_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert!(reminder_cache_key(&headers, &user).is_err());
    }
}
