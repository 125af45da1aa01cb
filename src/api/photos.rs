//! Photo endpoints
//!
//! The public surface is `/photos/featured` (portfolio picks) and the SSE
//! changefeed; the full listing and all writes are admin-only. Uploading the
//! image file is a separate step, so photo payloads carry its URL.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::NaiveDate;
use futures::stream::{self, Stream};
use serde::Deserialize;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::auth::AdminSession;
use crate::domain::aggregates::Photo;
use crate::domain::events::{DomainEvent, PhotoEvent};
use crate::error::AppError;
use crate::repo::PhotoFilter;
use crate::storage::parse_public_url;

#[derive(Debug, Deserialize)] pub struct ListParams { pub category: Option<String> }

#[derive(Debug, Deserialize, Validate)]
pub struct PhotoPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(url)]
    pub image: String,
    #[serde(default)]
    pub author: String,
    pub taken_at: Option<NaiveDate>,
    pub location: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub settings: Option<String>,
    #[serde(default)]
    pub in_portfolio: bool,
}

impl PhotoPayload {
    fn into_photo(self) -> Photo {
        let mut photo = Photo::new(self.title, self.description, self.category, self.image, self.author);
        photo.taken_at = self.taken_at;
        photo.location = self.location;
        photo.camera = self.camera;
        photo.lens = self.lens;
        photo.settings = self.settings;
        photo.in_portfolio = self.in_portfolio;
        photo
    }
}

pub async fn list(
    State(s): State<AppState>,
    _admin: AdminSession,
    Query(p): Query<ListParams>,
) -> Result<Json<Vec<Photo>>, AppError> {
    let photos = s
        .photos
        .list(PhotoFilter {
            category: p.category,
            portfolio_only: false,
        })
        .await?;
    Ok(Json(photos))
}

pub async fn featured(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Result<Json<Vec<Photo>>, AppError> {
    let photos = s
        .photos
        .list(PhotoFilter {
            category: p.category,
            portfolio_only: true,
        })
        .await?;
    Ok(Json(photos))
}

/// Server-sent photo changefeed. Other event kinds are filtered out; a
/// subscriber that lags misses a few events and stays connected.
pub async fn feed(State(s): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = s.events.subscribe();
    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(DomainEvent::Photo(event)) => {
                    if let Ok(sse) = Event::default().event("photo").json_data(&event) {
                        return Some((Ok(sse), rx));
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn get(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Photo>, AppError> {
    let photo = s.photos.get(id).await?.ok_or(AppError::NotFound("photo"))?;
    Ok(Json(photo))
}

pub async fn create(
    State(s): State<AppState>,
    _admin: AdminSession,
    Json(r): Json<PhotoPayload>,
) -> Result<(StatusCode, Json<Photo>), AppError> {
    r.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let photo = s.photos.create(r.into_photo()).await?;
    s.events
        .publish(DomainEvent::Photo(PhotoEvent::Created { photo: photo.clone() }))
        .await;
    Ok((StatusCode::CREATED, Json(photo)))
}

pub async fn update(
    State(s): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(r): Json<PhotoPayload>,
) -> Result<Json<Photo>, AppError> {
    r.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let existing = s.photos.get(id).await?.ok_or(AppError::NotFound("photo"))?;
    // Full-row replacement that keeps the row's identity.
    let mut photo = r.into_photo();
    photo.id = existing.id;
    photo.created_at = existing.created_at;
    let photo = s
        .photos
        .update(photo)
        .await
        .map_err(AppError::from_repo("photo"))?;
    s.events
        .publish(DomainEvent::Photo(PhotoEvent::Updated { photo: photo.clone() }))
        .await;
    Ok(Json(photo))
}

pub async fn remove(
    State(s): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let photo = s.photos.get(id).await?.ok_or(AppError::NotFound("photo"))?;
    s.photos
        .delete(id)
        .await
        .map_err(AppError::from_repo("photo"))?;

    if let Some((bucket, key)) = parse_public_url(&photo.image) {
        if let Err(e) = s.storage.delete(bucket, &key).await {
            tracing::warn!(%bucket, %key, "failed to remove stored image: {e}");
        }
    }
    s.events
        .publish(DomainEvent::Photo(PhotoEvent::Deleted { id }))
        .await;
    Ok(StatusCode::NO_CONTENT)
}
