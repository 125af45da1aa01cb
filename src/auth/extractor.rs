//! Bearer-token extractor for admin routes
//!
//! Add `AdminSession` as a handler argument to require a live admin token;
//! the extractor rejects with 401 before the handler body runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::api::AppState;
use crate::auth::Session;
use crate::error::AppError;

pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;
        let session = state.auth.session(token).ok_or(AppError::Unauthorized)?;
        Ok(AdminSession(session))
    }
}
