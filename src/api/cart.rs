//! Cart endpoints
//!
//! All cart routes are keyed by the caller's session id and every mutation
//! answers with the full updated cart, so the storefront renders from the
//! response. Adding a line checks the catalog; changing a quantity on an
//! existing line does not, the checkout guard has the final say.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::domain::aggregates::{Cart, CartItem};
use crate::domain::value_objects::Money;
use crate::error::AppError;

/// Wire shape of a cart: items plus the derived numbers the badge and the
/// summary row need.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub total: Money,
    pub open: bool,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            total: cart.total(),
            open: cart.is_open(),
            items: cart.items().to_vec(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize)] pub struct UpdateQuantityRequest { pub quantity: u32 }
#[derive(Debug, Deserialize)] pub struct VisibilityRequest { pub open: bool }

pub async fn get(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartView> {
    Json(s.carts.snapshot(&session).into())
}

pub async fn add_item(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Json(r): Json<AddItemRequest>,
) -> Result<Json<CartView>, AppError> {
    r.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let product = s
        .products
        .get(r.product_id)
        .await?
        .filter(|p| p.available)
        .ok_or(AppError::NotFound("product"))?;

    // Cap the line at what is actually on the shelf.
    let in_cart = s.carts.quantity_of(&session, product.id);
    if in_cart.saturating_add(r.quantity) > product.stock.value() {
        return Err(AppError::InsufficientStock {
            product: product.name,
        });
    }

    let cart = s.carts.add_item(
        &session,
        CartItem {
            product_id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: r.quantity,
        },
    );
    Ok(Json(cart.into()))
}

pub async fn update_item(
    State(s): State<AppState>,
    Path((session, product_id)): Path<(String, Uuid)>,
    Json(r): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    Json(s.carts.update_quantity(&session, product_id, r.quantity).into())
}

pub async fn remove_item(
    State(s): State<AppState>,
    Path((session, product_id)): Path<(String, Uuid)>,
) -> Json<CartView> {
    Json(s.carts.remove_item(&session, product_id).into())
}

pub async fn clear(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartView> {
    Json(s.carts.clear(&session).into())
}

pub async fn set_visibility(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Json(r): Json<VisibilityRequest>,
) -> Json<CartView> {
    Json(s.carts.set_open(&session, r.open).into())
}
