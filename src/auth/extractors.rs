use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{auth::repo_types::Session, error::AppError, state::AppState};

/// Active session presented on the request, already checked against the store.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Validated caller identity. Handlers taking this never re-check the token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Pulls the session id out of the configured header.
///
/// A value that is not a UUID can never name a session, so it is rejected here
/// without a round trip to the store.
pub(crate) fn session_token(headers: &HeaderMap, header: &str) -> Result<Uuid, AppError> {
    let raw = headers
        .get(header)
        .ok_or_else(|| AppError::Unauthorized("missing session token".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid session token".into()))?;

    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Unauthorized("invalid session token".into()))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = session_token(&parts.headers, &state.config.session_header).map_err(|e| {
            warn!(error = %e, "rejected session header");
            e
        })?;

        let user_id = Session::resolve_user(&state.db, id)
            .await
            .map_err(|e| {
                error!(error = %e, "session lookup failed");
                AppError::Internal(e)
            })?
            .ok_or_else(|| {
                warn!(session_id = %id, "unknown or archived session");
                AppError::Unauthorized("invalid session token".into())
            })?;

        Ok(CurrentSession { id, user_id })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;
        Ok(AuthUser(session.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request, StatusCode};

    fn parts_with(header: Option<(&str, HeaderValue)>) -> Parts {
        let mut builder = Request::builder().uri("/todo");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn session_token_parses_uuid_with_surrounding_space() {
        let id = Uuid::new_v4();
        let parts = parts_with(Some(("token", HeaderValue::from_str(&format!(" {id} ")).unwrap())));
        assert_eq!(session_token(&parts.headers, "token").unwrap(), id);
    }

    #[test]
    fn session_token_ignores_authorization_header() {
        let parts = parts_with(Some((
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", Uuid::new_v4())).unwrap(),
        )));
        let err = session_token(&parts.headers, "token").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn session_token_uses_configured_header_name() {
        let id = Uuid::new_v4();
        let parts = parts_with(Some(("x-session", HeaderValue::from_str(&id.to_string()).unwrap())));
        assert_eq!(session_token(&parts.headers, "x-session").unwrap(), id);
        assert!(session_token(&parts.headers, "token").is_err());
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized_without_store() {
        let state = AppState::fake();
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized_without_store() {
        let state = AppState::fake();
        let mut parts = parts_with(Some(("token", HeaderValue::from_static("not-a-session"))));
        let err = CurrentSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
