//! Product endpoints
//!
//! The public listing only ever shows available products; admins pass
//! `?all=true` (with a token) to manage the full catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::AppState;
use crate::auth::AdminSession;
use crate::domain::aggregates::Product;
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::domain::value_objects::{Money, Quantity};
use crate::error::AppError;
use crate::repo::ProductFilter;
use crate::storage::parse_public_url;

#[derive(Debug, Deserialize)] pub struct ListParams { pub category: Option<String>, #[serde(default)] pub all: bool }

#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom = "non_negative")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub stock: u32,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price must not be negative"));
    }
    Ok(())
}

pub async fn list(
    State(s): State<AppState>,
    admin: Option<AdminSession>,
    Query(p): Query<ListParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    let include_unavailable = if p.all {
        if admin.is_none() {
            return Err(AppError::Unauthorized);
        }
        true
    } else {
        false
    };
    let products = s
        .products
        .list(ProductFilter {
            category: p.category,
            include_unavailable,
        })
        .await?;
    Ok(Json(products))
}

pub async fn get(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Product>, AppError> {
    let product = s.products.get(id).await?.ok_or(AppError::NotFound("product"))?;
    Ok(Json(product))
}

pub async fn create(
    State(s): State<AppState>,
    _admin: AdminSession,
    Json(r): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    r.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let product = Product::new(
        r.name,
        r.description,
        Money::new(r.price),
        r.image,
        r.category,
        Quantity::new(r.stock),
        r.available,
    );
    let product = s.products.create(product).await?;
    s.events
        .publish(DomainEvent::Product(ProductEvent::Created { id: product.id }))
        .await;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(s): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(r): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    r.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let mut product = s.products.get(id).await?.ok_or(AppError::NotFound("product"))?;
    product.name = r.name;
    product.description = r.description;
    product.price = Money::new(r.price);
    product.image = r.image;
    product.category = r.category;
    product.stock = Quantity::new(r.stock);
    product.available = r.available;
    let product = s
        .products
        .update(product)
        .await
        .map_err(AppError::from_repo("product"))?;
    s.events
        .publish(DomainEvent::Product(ProductEvent::Updated { id: product.id }))
        .await;
    Ok(Json(product))
}

pub async fn remove(
    State(s): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let product = s.products.get(id).await?.ok_or(AppError::NotFound("product"))?;
    s.products
        .delete(id)
        .await
        .map_err(AppError::from_repo("product"))?;

    // Object cleanup is best effort; the row is already gone.
    if let Some((bucket, key)) = parse_public_url(&product.image) {
        if let Err(e) = s.storage.delete(bucket, &key).await {
            tracing::warn!(%bucket, %key, "failed to remove stored image: {e}");
        }
    }
    s.events
        .publish(DomainEvent::Product(ProductEvent::Deleted { id }))
        .await;
    Ok(StatusCode::NO_CONTENT)
}
