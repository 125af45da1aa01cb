//! Order admin endpoints
//!
//! Read-only listing plus the status transition; orders are only ever
//! created through the checkout.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{AppState, PaginatedResponse};
use crate::auth::AdminSession;
use crate::domain::aggregates::{Order, OrderItem, OrderStatus};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::error::AppError;
use crate::repo::ListQuery;

#[derive(Debug, Deserialize)] pub struct PageParams { pub page: Option<u32>, pub per_page: Option<u32> }
#[derive(Debug, Deserialize)] pub struct StatusRequest { pub status: OrderStatus }

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

pub async fn list(
    State(s): State<AppState>,
    _admin: AdminSession,
    Query(p): Query<PageParams>,
) -> Result<Json<PaginatedResponse<Order>>, AppError> {
    let query = ListQuery::new(p.page, p.per_page);
    let (orders, total) = s.orders.list(query).await?;
    Ok(Json(PaginatedResponse {
        data: orders,
        total,
        page: query.page,
    }))
}

pub async fn get(State(s): State<AppState>, _admin: AdminSession, Path(id): Path<Uuid>) -> Result<Json<OrderDetail>, AppError> {
    let (order, items) = s.orders.get(id).await?.ok_or(AppError::NotFound("order"))?;
    Ok(Json(OrderDetail { order, items }))
}

pub async fn set_status(
    State(s): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(r): Json<StatusRequest>,
) -> Result<Json<Order>, AppError> {
    let (before, _) = s.orders.get(id).await?.ok_or(AppError::NotFound("order"))?;
    let order = s
        .orders
        .transition_status(id, r.status)
        .await
        .map_err(AppError::from_repo("order"))?;

    tracing::info!(reference = %order.reference, from = %before.status, to = %order.status, "order status changed");
    s.events
        .publish(DomainEvent::Order(OrderEvent::StatusChanged {
            order_id: order.id,
            from: before.status,
            to: order.status,
        }))
        .await;
    Ok(Json(order))
}
