use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest},
        extractors::CurrentSession,
        password,
        repo_types::{Session, User},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = body.map_err(|e| {
        warn!(error = %e, "malformed register body");
        e
    })?;

    let hash = password::hash(payload.password).await?;

    let user = match User::create(&state.db, &payload.name, &payload.email, &hash).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, "user registered");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let Json(payload) = body.map_err(|e| {
        warn!(error = %e, "malformed login body");
        e
    })?;

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e.into());
        }
    };

    // unknown emails still pay for a hash check
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let valid = password::verify(payload.password, stored).await?;

    let user = match user {
        Some(u) if valid => u,
        Some(u) => {
            warn!(user_id = %u.id, "login invalid password");
            return Err(AppError::Unauthorized("invalid credentials".into()));
        }
        None => {
            warn!("login unknown email");
            return Err(AppError::Unauthorized("invalid credentials".into()));
        }
    };

    let session = match Session::create(&state.db, user.id).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "create session failed");
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, "user logged in");
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token: session.id.to_string(),
        }),
    ))
}

/// Archives the presented session; the token stops authenticating immediately.
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<StatusCode, AppError> {
    let archived = Session::archive(&state.db, session.id, session.user_id).await?;
    info!(user_id = %session.user_id, archived, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}
