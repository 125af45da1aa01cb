//! Auth endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::AppState;
use crate::auth::{AdminSession, AuthError};
use crate::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)] pub struct SessionResponse { pub token: String, pub email: String, pub expires_at: DateTime<Utc> }

pub async fn login(
    State(s): State<AppState>,
    Json(r): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    r.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let session = s.auth.sign_in(&r.email, &r.password).map_err(|e| match e {
        AuthError::InvalidCredentials => AppError::InvalidCredentials,
        AuthError::BadHash(msg) => AppError::Internal(msg),
    })?;
    tracing::info!(email = %session.email, "admin signed in");
    Ok(Json(SessionResponse {
        token: session.token,
        email: session.email,
        expires_at: session.expires_at,
    }))
}

pub async fn logout(State(s): State<AppState>, admin: AdminSession) -> StatusCode {
    s.auth.sign_out(&admin.0.token);
    StatusCode::NO_CONTENT
}

pub async fn session(admin: AdminSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        token: admin.0.token,
        email: admin.0.email,
        expires_at: admin.0.expires_at,
    })
}
