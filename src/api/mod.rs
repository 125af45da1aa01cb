//! HTTP API
//!
//! Route table, shared state and the pagination envelope. Handlers live in
//! one module per resource; admin routes take the [`AdminSession`] extractor
//! and everything else is public.
//!
//! [`AdminSession`]: crate::auth::AdminSession

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod photos;
pub mod products;
pub mod uploads;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::AuthService;
use crate::carts::CartStore;
use crate::events::EventBus;
use crate::repo::{OrderRepository, PhotoRepository, ProductRepository};
use crate::storage::ObjectStorage;

/// Request bodies above this size are rejected before any handler runs;
/// uploads are the only large payloads.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub photos: Arc<dyn PhotoRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub carts: Arc<CartStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth: Arc<AuthService>,
    pub events: EventBus,
}

#[derive(Debug, Serialize)] pub struct PaginatedResponse<T> { pub data: Vec<T>, pub total: i64, pub page: u32 }

pub fn router(state: AppState, media_root: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "atelier-studio"})) }))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/session", get(auth::session))
        .route("/api/v1/products", get(products::list).post(products::create))
        .route("/api/v1/products/:id", get(products::get).put(products::update).delete(products::remove))
        .route("/api/v1/photos", get(photos::list).post(photos::create))
        .route("/api/v1/photos/featured", get(photos::featured))
        .route("/api/v1/photos/feed", get(photos::feed))
        .route("/api/v1/photos/:id", get(photos::get).put(photos::update).delete(photos::remove))
        .route("/api/v1/uploads/:bucket", post(uploads::upload))
        .route("/api/v1/cart/:session", get(cart::get).delete(cart::clear))
        .route("/api/v1/cart/:session/items", post(cart::add_item))
        .route("/api/v1/cart/:session/items/:product_id", put(cart::update_item).delete(cart::remove_item))
        .route("/api/v1/cart/:session/visibility", put(cart::set_visibility))
        .route("/api/v1/checkout", post(checkout::place))
        .route("/api/v1/orders", get(orders::list))
        .route("/api/v1/orders/:id", get(orders::get))
        .route("/api/v1/orders/:id/status", put(orders::set_status))
        .nest_service("/media", ServeDir::new(media_root.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
