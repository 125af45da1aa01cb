//! Checkout endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::checkout;
use crate::domain::aggregates::ContactDetails;
use crate::domain::value_objects::Money;
use crate::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 100))]
    pub session_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub phone: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)] pub struct CheckoutResponse { pub order_id: Uuid, pub reference: String, pub total: Money }

pub async fn place(
    State(s): State<AppState>,
    Json(r): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    r.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let contact = ContactDetails {
        name: r.name,
        email: r.email,
        phone: r.phone,
        address: r.address,
        notes: r.notes,
    };
    let (order, _items) = checkout::place_order(
        s.products.as_ref(),
        s.orders.as_ref(),
        &s.carts,
        &s.events,
        &r.session_id,
        contact,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: order.id,
            reference: order.reference,
            total: order.total,
        }),
    ))
}
